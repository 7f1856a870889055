//! Author reference deduplication
//!
//! Listing pages yield one author reference per quote. The worklist for
//! profile fetching keeps the first reference for each exact display name.

use crate::records::AuthorReference;
use std::collections::HashMap;

/// Unique author worklist plus what was discarded to build it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicated {
    /// First occurrence of each name, in first-seen order
    pub authors: Vec<AuthorReference>,

    /// Discarded occurrences
    pub repeated: usize,

    /// Discarded occurrences whose profile URL differed from the kept one
    pub conflicting: usize,
}

/// Collapses references with equal `name`, first occurrence wins
///
/// A later reference with the same name but another profile URL is still
/// discarded; two distinct people sharing a display name are merged into
/// one author. Such merges are logged and counted in `conflicting`.
pub fn dedupe<I>(references: I) -> Deduplicated
where
    I: IntoIterator<Item = AuthorReference>,
{
    let mut kept: HashMap<String, usize> = HashMap::new();
    let mut result = Deduplicated::default();

    for reference in references {
        match kept.get(&reference.name).copied() {
            Some(index) => {
                result.repeated += 1;
                let first = &result.authors[index];
                if first.profile_url != reference.profile_url {
                    result.conflicting += 1;
                    tracing::warn!(
                        "Author '{}' seen with profile {} after {}; keeping the first",
                        reference.name,
                        reference.profile_url,
                        first.profile_url
                    );
                }
            }
            None => {
                kept.insert(reference.name.clone(), result.authors.len());
                result.authors.push(reference);
            }
        }
    }

    tracing::info!(
        "Found {} unique authors ({} repeated references)",
        result.authors.len(),
        result.repeated
    );

    result
}
