//! Quote-Harvester: a paginated quote listing crawler
//!
//! This crate walks the "next" chain of a quote listing, extracts quotes and
//! author references, resolves each unique author's profile page, links
//! quotes to authors by name and stores both record sets with
//! insert-if-absent semantics.

pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod staging;
pub mod storage;

use thiserror::Error;

/// Main error type for Quote-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] crawler::FetchError),

    #[error("Markup structure error: {0}")]
    Structure(#[from] crawler::ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Staging error: {0}")]
    Staging(#[from] staging::StagingError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunReport};
pub use records::{AuthorRecord, AuthorReference, LinkedQuote, QuoteRecord};
