//! Storage traits and error types
//!
//! This module defines the trait interface for document store backends and
//! associated error types.

use crate::output::RunReport;
use crate::records::AuthorRecord;
use crate::storage::{RunRecord, StoredAuthor, StoredQuote};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Author not found: {0}")]
    AuthorNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Document store holding authors, quotes and run history
///
/// Lookups are by identity key: an author's full name, a quote's text.
/// Inserts do not check for existing records; callers wanting
/// insert-if-absent semantics look up first (see `storage::persist`).
pub trait Store {
    // ===== Authors =====

    /// Finds the author with exactly this full name
    fn find_author(&self, full_name: &str) -> StorageResult<Option<StoredAuthor>>;

    /// Inserts one author and returns its ID
    fn insert_author(&mut self, author: &AuthorRecord) -> StorageResult<i64>;

    /// Inserts several authors at once, returning their IDs in input order
    fn insert_authors(&mut self, authors: &[AuthorRecord]) -> StorageResult<Vec<i64>>;

    /// Gets all authors ordered by ID
    fn list_authors(&self) -> StorageResult<Vec<StoredAuthor>>;

    /// Counts stored authors
    fn count_authors(&self) -> StorageResult<u64>;

    // ===== Quotes =====

    /// Finds the quote with exactly this text
    fn find_quote(&self, text: &str) -> StorageResult<Option<StoredQuote>>;

    /// Inserts a quote owned by `author_id` with its ordered tags
    fn insert_quote(&mut self, text: &str, author_id: i64, tags: &[String])
        -> StorageResult<i64>;

    /// Gets all quotes ordered by ID, tags in markup order
    fn list_quotes(&self) -> StorageResult<Vec<StoredQuote>>;

    /// Counts stored quotes
    fn count_quotes(&self) -> StorageResult<u64>;

    /// Counts distinct tags across all quotes
    fn count_distinct_tags(&self) -> StorageResult<u64>;

    // ===== Run Management =====

    /// Creates a new harvest run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as completed and stores its counters
    fn complete_run(&mut self, run_id: i64, report: &RunReport) -> StorageResult<()>;

    /// Marks a run as failed with the error that stopped it
    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
