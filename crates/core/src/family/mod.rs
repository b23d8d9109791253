// Family graph: member records, the indexed working set, generation
// resolution and tree-level statistics.

pub mod generation;
pub mod member;
pub mod stats;
pub mod tree;

pub use generation::{max_generation_depth, resolve_generations, Generations};
pub use member::Member;
pub use stats::FamilyStats;
pub use tree::FamilyTree;
