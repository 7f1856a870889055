//! HTML record extraction for quote listings and author profiles
//!
//! Extraction is strict: when an expected element is missing the document
//! does not match the listing schema and the whole run stops. Nothing is
//! extracted on a best-effort basis.

use crate::records::{AuthorRecord, AuthorReference, ListingRecords, QuoteRecord};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const NEXT_ITEM: &str = "li.next";
const NEXT_LINK: &str = "a";
const QUOTE: &str = "div.quote";
const QUOTE_AUTHOR: &str = "small.author";
const QUOTE_TEXT: &str = "span.text";
const QUOTE_TAGS: &str = "div.tags";
const QUOTE_TAG: &str = "a.tag";
const AUTHOR_LINK: &str = "a[href]:not([class])";
const PROFILE_TITLE: &str = "h3.author-title";
const PROFILE_BORN_DATE: &str = "span.author-born-date";
const PROFILE_BORN_LOCATION: &str = "span.author-born-location";
const PROFILE_DESCRIPTION: &str = "div.author-description";

/// The document does not have the expected structure
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    #[error("Missing element '{selector}' in {context}")]
    MissingElement {
        selector: &'static str,
        context: &'static str,
    },

    #[error("Element '{selector}' has no '{attribute}' attribute")]
    MissingAttribute {
        selector: &'static str,
        attribute: &'static str,
    },
}

/// Query surface the pipeline needs from a markup parser
pub trait Extractor {
    /// Returns the "next page" pointer of a listing page, if any
    fn next_page(&self, document: &str) -> Result<Option<String>, ExtractError>;

    /// Extracts quotes and one author reference per quote element
    ///
    /// Profile links are resolved against `base`.
    fn extract_listing(&self, document: &str, base: &str)
        -> Result<ListingRecords, ExtractError>;

    /// Extracts the author record from a profile page
    fn extract_profile(&self, document: &str) -> Result<AuthorRecord, ExtractError>;
}

/// `Extractor` for the quotes listing markup, built on `scraper`
#[derive(Debug)]
pub struct HtmlExtractor {
    next_item: Selector,
    next_link: Selector,
    quote: Selector,
    quote_author: Selector,
    quote_text: Selector,
    quote_tags: Selector,
    quote_tag: Selector,
    author_link: Selector,
    profile_title: Selector,
    profile_born_date: Selector,
    profile_born_location: Selector,
    profile_description: Selector,
}

impl HtmlExtractor {
    /// Compiles all selectors once
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            next_item: compile(NEXT_ITEM)?,
            next_link: compile(NEXT_LINK)?,
            quote: compile(QUOTE)?,
            quote_author: compile(QUOTE_AUTHOR)?,
            quote_text: compile(QUOTE_TEXT)?,
            quote_tags: compile(QUOTE_TAGS)?,
            quote_tag: compile(QUOTE_TAG)?,
            author_link: compile(AUTHOR_LINK)?,
            profile_title: compile(PROFILE_TITLE)?,
            profile_born_date: compile(PROFILE_BORN_DATE)?,
            profile_born_location: compile(PROFILE_BORN_LOCATION)?,
            profile_description: compile(PROFILE_DESCRIPTION)?,
        })
    }

    fn extract_quote(
        &self,
        element: ElementRef<'_>,
        base: &str,
    ) -> Result<(QuoteRecord, AuthorReference), ExtractError> {
        let author_name = text_of(first(element, &self.quote_author, QUOTE_AUTHOR, "quote")?);
        let text = text_of(first(element, &self.quote_text, QUOTE_TEXT, "quote")?);

        let tags = first(element, &self.quote_tags, QUOTE_TAGS, "quote")?
            .select(&self.quote_tag)
            .map(|tag| text_of(tag).trim().to_string())
            .collect();

        let href = first(element, &self.author_link, AUTHOR_LINK, "quote")?
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingAttribute {
                selector: AUTHOR_LINK,
                attribute: "href",
            })?;

        let reference = AuthorReference {
            name: author_name.clone(),
            profile_url: join_url(base, href),
        };

        Ok((
            QuoteRecord {
                text,
                author_name,
                tags,
            },
            reference,
        ))
    }
}

impl Extractor for HtmlExtractor {
    fn next_page(&self, document: &str) -> Result<Option<String>, ExtractError> {
        let html = Html::parse_document(document);

        let item = match html.select(&self.next_item).next() {
            Some(item) => item,
            None => return Ok(None),
        };

        // A next marker without its link means the markup changed
        let link = first(item, &self.next_link, NEXT_LINK, "next link")?;
        let href = link.value().attr("href").ok_or(ExtractError::MissingAttribute {
            selector: NEXT_LINK,
            attribute: "href",
        })?;
        Ok(Some(href.to_string()))
    }

    fn extract_listing(
        &self,
        document: &str,
        base: &str,
    ) -> Result<ListingRecords, ExtractError> {
        let html = Html::parse_document(document);
        let mut records = ListingRecords::default();

        for element in html.select(&self.quote) {
            let (quote, reference) = self.extract_quote(element, base)?;
            records.quotes.push(quote);
            records.authors.push(reference);
        }

        Ok(records)
    }

    fn extract_profile(&self, document: &str) -> Result<AuthorRecord, ExtractError> {
        let html = Html::parse_document(document);
        let root = html.root_element();

        let field = |selector: &Selector, name: &'static str| {
            first(root, selector, name, "author profile").map(|el| text_of(el).trim().to_string())
        };

        Ok(AuthorRecord {
            full_name: field(&self.profile_title, PROFILE_TITLE)?,
            born_date: field(&self.profile_born_date, PROFILE_BORN_DATE)?,
            born_location: field(&self.profile_born_location, PROFILE_BORN_LOCATION)?,
            description: field(&self.profile_description, PROFILE_DESCRIPTION)?,
        })
    }
}

/// Appends a site-relative pointer to a base URL
///
/// The pointer is concatenated as is, except that a slash present on both
/// sides is kept once. Absolute `http(s)` pointers are returned unchanged.
pub fn join_url(base: &str, pointer: &str) -> String {
    if pointer.starts_with("http://") || pointer.starts_with("https://") {
        return pointer.to_string();
    }

    match (base.strip_suffix('/'), pointer.starts_with('/')) {
        (Some(trimmed), true) => format!("{}{}", trimmed, pointer),
        _ => format!("{}{}", base, pointer),
    }
}

fn compile(selector: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector,
        message: format!("{:?}", e),
    })
}

fn first<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    name: &'static str,
    context: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    scope
        .select(selector)
        .next()
        .ok_or(ExtractError::MissingElement {
            selector: name,
            context,
        })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
