//! Per-run harvest report
//!
//! Every stage that silently filters or merges records reports how many it
//! touched, so nothing disappears without a trace.

use std::time::Duration;

/// Counters collected over one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Listing pages walked
    pub pages: usize,

    /// Quotes extracted from all pages
    pub quotes_extracted: usize,

    /// Author references extracted, one per quote
    pub author_references: usize,

    /// Unique author names after deduplication
    pub unique_authors: usize,

    /// References merged into an earlier one despite a different profile URL
    pub merged_references: usize,

    /// Author profiles fetched and parsed
    pub authors_resolved: usize,

    /// Quotes whose author name matched no resolved author
    pub quotes_unlinked: usize,

    pub authors_inserted: usize,
    pub authors_skipped: usize,
    pub quotes_inserted: usize,
    pub quotes_skipped: usize,

    /// Linked quotes whose author was not found in the store
    pub quotes_unresolved: usize,

    pub elapsed: Duration,
}

impl RunReport {
    /// Quotes extracted but never stored for lack of an author
    pub fn quotes_dropped(&self) -> usize {
        self.quotes_unlinked + self.quotes_unresolved
    }
}

/// Prints a run report to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");

    println!("Crawl:");
    println!("  Listing pages: {}", report.pages);
    println!("  Quotes extracted: {}", report.quotes_extracted);
    println!(
        "  Author references: {} ({} unique, {} merged)",
        report.author_references, report.unique_authors, report.merged_references
    );
    println!("  Author profiles resolved: {}", report.authors_resolved);
    println!();

    println!("Store:");
    println!(
        "  Authors: {} inserted, {} already present",
        report.authors_inserted, report.authors_skipped
    );
    println!(
        "  Quotes: {} inserted, {} already present, {} dropped",
        report.quotes_inserted,
        report.quotes_skipped,
        report.quotes_dropped()
    );
    println!();

    println!("Finished in {:.2} seconds", report.elapsed.as_secs_f64());
}
