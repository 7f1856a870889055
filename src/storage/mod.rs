//! Storage module for persisting harvested records
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Author and quote collections with identity-key lookups
//! - Insert-if-absent persistence of a harvest's results
//! - Run tracking

mod persist;
mod schema;
mod sqlite;
mod traits;

pub use persist::{persist_authors, persist_quotes, PersistOutcome};
pub use sqlite::SqliteStore;
pub use traits::{StorageError, StorageResult, Store};

use std::path::Path;

/// Initializes or opens a store database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// An author as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuthor {
    pub id: i64,
    pub full_name: String,
    pub born_date: String,
    pub born_location: String,
    pub description: String,
    pub created_at: String,
}

/// A quote as stored, with its owning author resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuote {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub author_name: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Represents a harvest run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub error_message: Option<String>,
    pub pages: Option<u64>,

    /// References merged into an earlier one with another profile URL
    pub authors_merged: Option<u64>,
    pub authors_inserted: Option<u64>,
    pub authors_skipped: Option<u64>,
    pub quotes_inserted: Option<u64>,
    pub quotes_skipped: Option<u64>,

    /// Quotes with no resolved author of that name
    pub quotes_unlinked: Option<u64>,

    /// Linked quotes whose author was missing from the store
    pub quotes_unresolved: Option<u64>,
}

/// Status of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
