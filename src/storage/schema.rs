//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Quote-Harvester database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track harvest runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    error_message TEXT,
    pages INTEGER,
    authors_merged INTEGER,
    authors_inserted INTEGER,
    authors_skipped INTEGER,
    quotes_inserted INTEGER,
    quotes_skipped INTEGER,
    quotes_unlinked INTEGER,
    quotes_unresolved INTEGER
);

-- Resolved authors, identified by full name
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL UNIQUE,
    born_date TEXT NOT NULL,
    born_location TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Quotes, identified by their text
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL UNIQUE,
    author_id INTEGER NOT NULL REFERENCES authors(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author_id);

-- Tags in markup order
CREATE TABLE IF NOT EXISTS quote_tags (
    quote_id INTEGER NOT NULL REFERENCES quotes(id),
    position INTEGER NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (quote_id, position)
);

CREATE INDEX IF NOT EXISTS idx_quote_tags_tag ON quote_tags(tag);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
