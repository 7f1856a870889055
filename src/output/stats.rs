//! Statistics generation from the store
//!
//! This module provides functionality for extracting and displaying
//! store contents for the `--stats` mode.

use crate::storage::{RunRecord, StorageResult, Store};

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    pub authors: u64,
    pub quotes: u64,
    pub distinct_tags: u64,

    /// Most recent harvest run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
pub fn load_statistics(store: &dyn Store) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        authors: store.count_authors()?,
        quotes: store.count_quotes()?,
        distinct_tags: store.count_distinct_tags()?,
        latest_run: store.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Authors: {}", stats.authors);
    println!("  Quotes: {}", stats.quotes);
    println!("  Distinct tags: {}", stats.distinct_tags);

    if stats.authors > 0 {
        println!(
            "  Quotes per author: {:.1}",
            stats.quotes as f64 / stats.authors as f64
        );
    }
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            if let Some(pages) = run.pages {
                println!("  Pages: {}", pages);
            }
            if let (Some(authors), Some(quotes)) = (run.authors_inserted, run.quotes_inserted) {
                println!("  Inserted: {} authors, {} quotes", authors, quotes);
            }
            if let (Some(unlinked), Some(unresolved)) = (run.quotes_unlinked, run.quotes_unresolved) {
                println!("  Quotes dropped: {} unlinked, {} unresolved", unlinked, unresolved);
            }
            if let Some(merged) = run.authors_merged {
                println!("  Authors merged: {}", merged);
            }
            if let Some(error) = &run.error_message {
                println!("  Error: {}", error);
            }
        }
        None => println!("No harvest runs recorded"),
    }
}
