use serde::Deserialize;

/// Main configuration structure for Quote-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub staging: Option<StagingConfig>,
}

/// Where the crawl starts and how far it may go
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// First page of the listing; "next" pointers are appended to it
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Optional cap on the number of listing pages walked
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,
}

/// Scheduling of profile page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// One fetch at a time, in call order
    Sequential,

    /// Profile fetches fan out up to `max-in-flight` at once
    Concurrent,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_mode")]
    pub mode: FetchMode,

    /// Maximum number of profile fetches in flight
    #[serde(rename = "max-in-flight", default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FetchConfig {
    /// Effective number of concurrent profile fetches for this mode, at least 1
    pub fn concurrency(&self) -> usize {
        match self.mode {
            FetchMode::Sequential => 1,
            FetchMode::Concurrent => self.max_in_flight.max(1),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: default_fetch_mode(),
            max_in_flight: default_max_in_flight(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_fetch_mode() -> FetchMode {
    FetchMode::Concurrent
}

fn default_max_in_flight() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Document store location
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// JSON checkpoint files written between extraction and persistence
#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    #[serde(rename = "authors-path")]
    pub authors_path: String,

    #[serde(rename = "quotes-path")]
    pub quotes_path: String,
}
