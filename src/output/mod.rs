//! Output module for reporting harvest results
//!
//! This module handles:
//! - The per-run report with every filter and merge counter
//! - Store statistics for the `--stats` mode

mod report;
pub mod stats;

pub use report::{print_report, RunReport};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
