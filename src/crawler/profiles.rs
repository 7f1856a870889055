//! Author profile resolution
//!
//! Fetches and parses one profile page per unique author reference, either
//! one at a time or as a bounded fan-out that is joined before returning.

use crate::config::{FetchConfig, FetchMode};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::records::{AuthorRecord, AuthorReference};
use crate::HarvestError;
use futures::stream::{self, StreamExt, TryStreamExt};

/// Resolves every reference into an author record
///
/// Every reference yields exactly one record, returned in input order. The
/// first fetch or markup failure aborts the whole resolution; fetches still
/// in flight at that point are dropped.
pub async fn resolve<F, E>(
    fetcher: &F,
    extractor: &E,
    references: &[AuthorReference],
    fetch: &FetchConfig,
) -> Result<Vec<AuthorRecord>, HarvestError>
where
    F: Fetcher,
    E: Extractor,
{
    tracing::info!(
        "Resolving {} author profiles ({:?}, concurrency {})",
        references.len(),
        fetch.mode,
        fetch.concurrency()
    );

    let authors = match fetch.mode {
        FetchMode::Sequential => {
            let mut authors = Vec::with_capacity(references.len());
            for reference in references {
                authors.push(resolve_one(fetcher, extractor, reference).await?);
            }
            authors
        }
        FetchMode::Concurrent => {
            stream::iter(references)
                .map(|reference| resolve_one(fetcher, extractor, reference))
                .buffered(fetch.concurrency())
                .try_collect::<Vec<_>>()
                .await?
        }
    };

    tracing::info!("Resolved {} authors", authors.len());
    Ok(authors)
}

async fn resolve_one<F, E>(
    fetcher: &F,
    extractor: &E,
    reference: &AuthorReference,
) -> Result<AuthorRecord, HarvestError>
where
    F: Fetcher,
    E: Extractor,
{
    let body = fetcher.fetch(&reference.profile_url).await?;
    let author = extractor.extract_profile(&body)?;

    if author.full_name != reference.name {
        tracing::warn!(
            "Profile {} is titled '{}' but quotes name '{}'; those quotes will not link",
            reference.profile_url,
            author.full_name,
            reference.name
        );
    }

    Ok(author)
}
