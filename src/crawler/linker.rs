//! Quote to author linking
//!
//! Joins quotes to resolved authors on exact name equality. A quote whose
//! author name matches no resolved author is left out.

use crate::records::{AuthorRecord, LinkedQuote, QuoteRecord};
use std::collections::HashMap;

/// Linked quotes and the number of quotes left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Linked {
    pub quotes: Vec<LinkedQuote>,
    pub dropped: usize,
}

/// Links each quote to the author whose `full_name` equals its author name
///
/// Output keeps input order. Misses are not errors: they are counted in
/// `dropped` and logged at debug level.
pub fn link<I>(quotes: I, authors: &[AuthorRecord]) -> Linked
where
    I: IntoIterator<Item = QuoteRecord>,
{
    let index: HashMap<&str, &AuthorRecord> = authors
        .iter()
        .map(|author| (author.full_name.as_str(), author))
        .collect();

    let mut linked = Linked::default();
    for quote in quotes {
        if index.contains_key(quote.author_name.as_str()) {
            linked.quotes.push(LinkedQuote::from(quote));
        } else {
            tracing::debug!(
                "No resolved author '{}', dropping quote {}",
                quote.author_name,
                quote.text
            );
            linked.dropped += 1;
        }
    }

    if linked.dropped > 0 {
        tracing::warn!(
            "{} quotes dropped: author name matched no resolved author",
            linked.dropped
        );
    }

    linked
}
