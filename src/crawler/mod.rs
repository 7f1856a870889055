//! Crawler module for the harvest pipeline
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` seam
//! - Markup extraction behind the `Extractor` seam
//! - Listing pagination and author profile resolution
//! - Author deduplication and quote linking
//! - Overall harvest coordination

mod coordinator;
mod dedupe;
mod extractor;
mod fetcher;
mod linker;
mod pagination;
mod profiles;


pub use coordinator::{run_harvest, Coordinator};
pub use dedupe::{dedupe, Deduplicated};
pub use extractor::{join_url, ExtractError, Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, user_agent_string, FetchError, Fetcher, HttpFetcher};
pub use linker::{link, Linked};
pub use pagination::{walk, ListingPage};
pub use profiles::resolve;

pub use crate::output::RunReport;
