// Health overview: per-member rows, filtering/sorting, aggregate
// statistics and CSV export.

pub mod export;
pub mod overview;
pub mod stats;

pub use export::{export_csv, export_csv_file};
pub use overview::{overview_rows, OverviewQuery, OverviewRow, SortKey};
pub use stats::{condition_label, HealthStats};
