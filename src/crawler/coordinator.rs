//! Harvest coordinator - main pipeline orchestration logic
//!
//! This module runs one harvest from start to finish:
//! - Recording the run in the store
//! - Walking the listing pages
//! - Deduplicating author references and resolving their profiles
//! - Optional JSON staging of the extracted records
//! - Linking quotes to authors and persisting both record sets

use crate::config::Config;
use crate::crawler::dedupe::dedupe;
use crate::crawler::extractor::HtmlExtractor;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::linker::link;
use crate::crawler::pagination::walk;
use crate::crawler::profiles::resolve;
use crate::output::RunReport;
use crate::records::{AuthorRecord, QuoteRecord};
use crate::staging::{read_json, write_json};
use crate::storage::{open_store, persist_authors, persist_quotes, SqliteStore, Store};
use crate::HarvestError;
use std::path::Path;
use std::time::Instant;

/// Main harvest coordinator structure
///
/// Owns every collaborator a run needs, so the stages receive them
/// explicitly instead of reaching for globals.
pub struct Coordinator<F: Fetcher = HttpFetcher, S: Store = SqliteStore> {
    config: Config,
    config_hash: String,
    fetcher: F,
    extractor: HtmlExtractor,
    store: S,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP fetcher and the configured SQLite store
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `config_hash` - Hash of the configuration file, recorded with each run
    pub fn new(config: Config, config_hash: String) -> Result<Self, HarvestError> {
        let store = open_store(Path::new(&config.store.database_path))?;
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.fetch)?;
        Self::with_parts(config, config_hash, fetcher, store)
    }
}

impl<F: Fetcher, S: Store> Coordinator<F, S> {
    /// Creates a coordinator from an already built fetcher and store
    pub fn with_parts(
        config: Config,
        config_hash: String,
        fetcher: F,
        store: S,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            config,
            config_hash,
            fetcher,
            extractor: HtmlExtractor::new()?,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one harvest
    ///
    /// The run is recorded in the store before anything is fetched. Any
    /// failure aborts the harvest and marks the run failed; records already
    /// persisted by then stay in the store.
    pub async fn run(&mut self) -> Result<RunReport, HarvestError> {
        let run_id = self.store.create_run(&self.config_hash)?;
        tracing::info!("Starting harvest run {}", run_id);

        match self.harvest().await {
            Ok(report) => {
                self.store.complete_run(run_id, &report)?;
                tracing::info!(
                    "Harvest completed: {} pages, {} authors and {} quotes inserted in {:?}",
                    report.pages,
                    report.authors_inserted,
                    report.quotes_inserted,
                    report.elapsed
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Harvest run {} failed: {}", run_id, e);
                if let Err(mark) = self.store.fail_run(run_id, &e.to_string()) {
                    tracing::warn!("Could not mark run {} as failed: {}", run_id, mark);
                }
                Err(e)
            }
        }
    }

    async fn harvest(&mut self) -> Result<RunReport, HarvestError> {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        let pages = walk(
            &self.fetcher,
            &self.extractor,
            &self.config.source.seed_url,
            self.config.source.max_pages,
        )
        .await?;
        report.pages = pages.len();

        let mut quotes: Vec<QuoteRecord> = Vec::new();
        let mut references = Vec::new();
        for page in pages {
            quotes.extend(page.records.quotes);
            references.extend(page.records.authors);
        }
        report.quotes_extracted = quotes.len();
        report.author_references = references.len();

        let unique = dedupe(references);
        report.unique_authors = unique.authors.len();
        report.merged_references = unique.conflicting;

        let mut authors = resolve(
            &self.fetcher,
            &self.extractor,
            &unique.authors,
            &self.config.fetch,
        )
        .await?;
        report.authors_resolved = authors.len();

        if let Some(staging) = &self.config.staging {
            let authors_path = Path::new(&staging.authors_path);
            let quotes_path = Path::new(&staging.quotes_path);

            write_json(authors_path, &authors)?;
            write_json(quotes_path, &quotes)?;

            authors = read_json::<AuthorRecord>(authors_path)?;
            quotes = read_json::<QuoteRecord>(quotes_path)?;
        }

        let linked = link(quotes, &authors);
        report.quotes_unlinked = linked.dropped;

        let saved_authors = persist_authors(&mut self.store, &authors)?;
        report.authors_inserted = saved_authors.inserted;
        report.authors_skipped = saved_authors.skipped;

        let saved_quotes = persist_quotes(&mut self.store, &linked.quotes)?;
        report.quotes_inserted = saved_quotes.inserted;
        report.quotes_skipped = saved_quotes.skipped;
        report.quotes_unresolved = saved_quotes.unresolved;

        report.elapsed = start_time.elapsed();
        Ok(report)
    }
}

/// Runs a complete harvest with the HTTP fetcher and SQLite store
///
/// # Example
///
/// ```no_run
/// use quote_harvester::config::load_config_with_hash;
/// use quote_harvester::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let report = run_harvest(config, hash).await?;
/// println!("{} quotes stored", report.quotes_inserted);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, config_hash: String) -> Result<RunReport, HarvestError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
