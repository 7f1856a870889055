//! Listing pagination
//!
//! Walks the "next" pointer chain starting at the seed URL. Each page is
//! fetched once and its records are extracted on the way, so later stages
//! never go back to the listing.

use crate::crawler::extractor::{join_url, Extractor};
use crate::crawler::fetcher::Fetcher;
use crate::records::ListingRecords;
use crate::HarvestError;

/// One listing page in crawl order, with the records found on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub url: String,
    pub records: ListingRecords,
}

/// Walks the listing from `seed` until a page has no "next" pointer
///
/// The chain is not checked for cycles. `max_pages` stops the walk early
/// and is the only guard against a listing that never ends.
///
/// # Returns
///
/// * `Ok(Vec<ListingPage>)` - Pages in crawl order, the seed first
/// * `Err(HarvestError)` - The first fetch or markup failure
pub async fn walk<F, E>(
    fetcher: &F,
    extractor: &E,
    seed: &str,
    max_pages: Option<usize>,
) -> Result<Vec<ListingPage>, HarvestError>
where
    F: Fetcher,
    E: Extractor,
{
    tracing::info!("Walking listing pages from {}", seed);

    let mut pages: Vec<ListingPage> = Vec::new();
    let mut current = Some(seed.to_string());

    while let Some(url) = current.take() {
        if let Some(limit) = max_pages {
            if pages.len() >= limit {
                tracing::warn!(
                    "Stopping at {} pages (max-pages reached), {} not walked",
                    limit,
                    url
                );
                break;
            }
        }

        let body = fetcher.fetch(&url).await?;
        let records = extractor.extract_listing(&body, seed)?;
        current = extractor
            .next_page(&body)?
            .map(|pointer| join_url(seed, &pointer));

        tracing::debug!(
            "Page {} ({}): {} quotes",
            pages.len() + 1,
            url,
            records.quotes.len()
        );
        pages.push(ListingPage { url, records });
    }

    tracing::info!("Found {} listing pages", pages.len());
    Ok(pages)
}
