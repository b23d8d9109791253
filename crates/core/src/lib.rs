//! Family-tree analytics for TreeTrace: generation resolution over
//! parent-linked members, tree statistics, and health-overview aggregation.

pub mod error;
pub mod family;
pub mod health;

pub use error::{Result, TreeError};
pub use family::{max_generation_depth, resolve_generations, FamilyTree, Generations, Member};
