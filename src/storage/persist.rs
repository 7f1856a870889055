//! Insert-if-absent persistence of harvested records
//!
//! Authors are keyed by full name, quotes by text. Records already in the
//! store are skipped, so running a harvest twice against the same store
//! leaves it unchanged the second time.

use crate::records::{AuthorRecord, LinkedQuote};
use crate::storage::traits::{StorageResult, Store};
use std::collections::HashSet;

/// What a persistence pass did with its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    pub inserted: usize,

    /// Records whose identity key was already taken
    pub skipped: usize,

    /// Quotes whose author name matched no stored author
    pub unresolved: usize,
}

/// Stores every author whose full name is not stored yet
///
/// Two records with the same full name in one batch are also collapsed;
/// the first one is kept. New authors are written with one `insert_authors`
/// call.
pub fn persist_authors<S>(store: &mut S, authors: &[AuthorRecord]) -> StorageResult<PersistOutcome>
where
    S: Store + ?Sized,
{
    tracing::info!("Saving {} authors", authors.len());

    let mut outcome = PersistOutcome::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut fresh: Vec<AuthorRecord> = Vec::new();

    for author in authors {
        if !seen.insert(author.full_name.as_str()) {
            outcome.skipped += 1;
            continue;
        }

        if store.find_author(&author.full_name)?.is_some() {
            tracing::debug!("Author '{}' already stored", author.full_name);
            outcome.skipped += 1;
            continue;
        }

        fresh.push(author.clone());
    }

    if !fresh.is_empty() {
        outcome.inserted = store.insert_authors(&fresh)?.len();
    }

    tracing::info!(
        "Authors saved: {} inserted, {} already present",
        outcome.inserted,
        outcome.skipped
    );
    Ok(outcome)
}

/// Stores every quote whose text is not stored yet
///
/// The owning author is looked up in the store by the quote's author name,
/// so authors must be persisted first. A quote whose author is not in the
/// store is skipped and counted as unresolved.
pub fn persist_quotes<S>(store: &mut S, quotes: &[LinkedQuote]) -> StorageResult<PersistOutcome>
where
    S: Store + ?Sized,
{
    tracing::info!("Saving {} quotes", quotes.len());

    let mut outcome = PersistOutcome::default();

    for quote in quotes {
        let author = match store.find_author(&quote.author_name)? {
            Some(author) => author,
            None => {
                tracing::debug!("Author '{}' not stored, skipping quote", quote.author_name);
                outcome.unresolved += 1;
                continue;
            }
        };

        if store.find_quote(&quote.text)?.is_some() {
            outcome.skipped += 1;
            continue;
        }

        store.insert_quote(&quote.text, author.id, &quote.tags)?;
        outcome.inserted += 1;
    }

    tracing::info!(
        "Quotes saved: {} inserted, {} already present, {} without stored author",
        outcome.inserted,
        outcome.skipped,
        outcome.unresolved
    );
    Ok(outcome)
}
