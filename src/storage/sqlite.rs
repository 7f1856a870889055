//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.

use crate::output::RunReport;
use crate::records::AuthorRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageError, StorageResult, Store};
use crate::storage::{RunRecord, RunStatus, StoredAuthor, StoredQuote};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const AUTHOR_COLUMNS: &str =
    "id, full_name, born_date, born_location, description, created_at";

const QUOTE_COLUMNS: &str = "q.id, q.text, q.author_id, a.full_name, q.created_at
     FROM quotes q JOIN authors a ON a.id = q.author_id";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, error_message,
     pages, authors_merged, authors_inserted, authors_skipped, quotes_inserted, quotes_skipped,
     quotes_unlinked, quotes_unresolved";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_tags(&self, quote_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM quote_tags WHERE quote_id = ?1 ORDER BY position")?;

        let tags = stmt
            .query_map(params![quote_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(tags)
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn author_from_row(row: &Row<'_>) -> rusqlite::Result<StoredAuthor> {
    Ok(StoredAuthor {
        id: row.get(0)?,
        full_name: row.get(1)?,
        born_date: row.get(2)?,
        born_location: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Maps a quote row; tags are filled in separately
fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<StoredQuote> {
    Ok(StoredQuote {
        id: row.get(0)?,
        text: row.get(1)?,
        author_id: row.get(2)?,
        author_name: row.get(3)?,
        tags: Vec::new(),
        created_at: row.get(4)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    let counter = |index: usize| -> rusqlite::Result<Option<u64>> {
        Ok(row.get::<_, Option<i64>>(index)?.map(|v| v as u64))
    };

    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        error_message: row.get(5)?,
        pages: counter(6)?,
        authors_merged: counter(7)?,
        authors_inserted: counter(8)?,
        authors_skipped: counter(9)?,
        quotes_inserted: counter(10)?,
        quotes_skipped: counter(11)?,
        quotes_unlinked: counter(12)?,
        quotes_unresolved: counter(13)?,
    })
}

impl Store for SqliteStore {
    // ===== Authors =====

    fn find_author(&self, full_name: &str) -> StorageResult<Option<StoredAuthor>> {
        let author = self
            .conn
            .query_row(
                &format!("SELECT {} FROM authors WHERE full_name = ?1", AUTHOR_COLUMNS),
                params![full_name],
                author_from_row,
            )
            .optional()?;

        Ok(author)
    }

    fn insert_author(&mut self, author: &AuthorRecord) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO authors (full_name, born_date, born_location, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                author.full_name,
                author.born_date,
                author.born_location,
                author.description,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_authors(&mut self, authors: &[AuthorRecord]) -> StorageResult<Vec<i64>> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(authors.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO authors (full_name, born_date, born_location, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for author in authors {
                stmt.execute(params![
                    author.full_name,
                    author.born_date,
                    author.born_location,
                    author.description,
                    now
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    fn list_authors(&self) -> StorageResult<Vec<StoredAuthor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM authors ORDER BY id", AUTHOR_COLUMNS))?;

        let authors = stmt
            .query_map([], author_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(authors)
    }

    fn count_authors(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM authors")
    }

    // ===== Quotes =====

    fn find_quote(&self, text: &str) -> StorageResult<Option<StoredQuote>> {
        let quote = self
            .conn
            .query_row(
                &format!("SELECT {} WHERE q.text = ?1", QUOTE_COLUMNS),
                params![text],
                quote_from_row,
            )
            .optional()?;

        match quote {
            Some(mut quote) => {
                quote.tags = self.load_tags(quote.id)?;
                Ok(Some(quote))
            }
            None => Ok(None),
        }
    }

    fn insert_quote(
        &mut self,
        text: &str,
        author_id: i64,
        tags: &[String],
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let author_exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM authors WHERE id = ?1",
                params![author_id],
                |row| row.get(0),
            )
            .optional()?;
        if author_exists.is_none() {
            return Err(StorageError::AuthorNotFound(author_id));
        }

        tx.execute(
            "INSERT INTO quotes (text, author_id, created_at) VALUES (?1, ?2, ?3)",
            params![text, author_id, now],
        )?;
        let quote_id = tx.last_insert_rowid();

        {
            let mut stmt =
                tx.prepare("INSERT INTO quote_tags (quote_id, position, tag) VALUES (?1, ?2, ?3)")?;
            for (position, tag) in tags.iter().enumerate() {
                stmt.execute(params![quote_id, position as i64, tag])?;
            }
        }

        tx.commit()?;
        Ok(quote_id)
    }

    fn list_quotes(&self) -> StorageResult<Vec<StoredQuote>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} ORDER BY q.id", QUOTE_COLUMNS))?;

        let mut quotes = stmt
            .query_map([], quote_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for quote in &mut quotes {
            quote.tags = self.load_tags(quote.id)?;
        }

        Ok(quotes)
    }

    fn count_quotes(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM quotes")
    }

    fn count_distinct_tags(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT tag) FROM quote_tags")
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, report: &RunReport) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages = ?3, authors_merged = ?4,
             authors_inserted = ?5, authors_skipped = ?6,
             quotes_inserted = ?7, quotes_skipped = ?8,
             quotes_unlinked = ?9, quotes_unresolved = ?10
             WHERE id = ?11",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                report.pages as i64,
                report.merged_references as i64,
                report.authors_inserted as i64,
                report.authors_skipped as i64,
                report.quotes_inserted as i64,
                report.quotes_skipped as i64,
                report.quotes_unlinked as i64,
                report.quotes_unresolved as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, error_message = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, error, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }
}
