//! Record types flowing through the harvest pipeline
//!
//! Quotes and author references come out of listing pages, author records
//! come out of profile pages. Linked quotes are quotes whose author name is
//! known to match a resolved author.

use serde::{Deserialize, Serialize};

/// An unresolved pointer to an author, as seen inline in a quote element
///
/// Identity is `name`, compared exactly (case and whitespace sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorReference {
    /// Author display name as printed next to the quote
    pub name: String,

    /// Absolute URL of the author's profile page
    pub profile_url: String,
}

/// A fully resolved author, built from one profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Identity key in the store
    pub full_name: String,
    pub born_date: String,
    pub born_location: String,
    /// Biography text
    pub description: String,
}

/// A quote as extracted from a listing page, before linking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Quote text, identity key in the store
    pub text: String,

    /// Author display name, matched against `AuthorRecord::full_name`
    pub author_name: String,

    /// Tags in markup order
    pub tags: Vec<String>,
}

/// A quote whose author name resolved to a known author
///
/// `author_name` is a lookup key into the author collection, not an owning
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedQuote {
    pub text: String,
    pub author_name: String,
    pub tags: Vec<String>,
}

impl From<QuoteRecord> for LinkedQuote {
    fn from(quote: QuoteRecord) -> Self {
        Self {
            text: quote.text,
            author_name: quote.author_name,
            tags: quote.tags,
        }
    }
}

/// Records extracted from a single listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecords {
    pub quotes: Vec<QuoteRecord>,

    /// One reference per quote element, repeats included
    pub authors: Vec<AuthorReference>,
}
