//! Result model for a scraped page.
//!
//! These types serialize to the camelCase JSON wire format returned by the
//! REST API (`scrapedAt`, `sourceUrl`, `rawHtml`). A [`ScrapeResult`] is
//! always produced, even for failed scrapes; the `errors` list carries
//! whatever went wrong along the way.

use crate::error::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to an extracted section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Nav,
    Footer,
    Pricing,
    Faq,
    Grid,
    Section,
    Unknown,
}

impl SectionKind {
    /// Lowercase name used in section ids (`hero-0`, `pricing-3`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Nav => "nav",
            Self::Footer => "footer",
            Self::Pricing => "pricing",
            Self::Faq => "faq",
            Self::Grid => "grid",
            Self::Section => "section",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hyperlink found inside a section, href resolved to absolute form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// An image found inside a section, src resolved to absolute form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Structured content pulled out of one section candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionContent {
    /// Non-empty heading texts (h1-h6) in document order.
    pub headings: Vec<String>,
    /// Whitespace-flattened text of the whole section.
    pub text: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    /// One entry per ul/ol, each a list of item texts.
    pub lists: Vec<Vec<String>>,
    /// One entry per table: rows of cell texts.
    pub tables: Vec<Vec<Vec<String>>>,
}

/// One extracted page section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable id of the form `<kind>-<index>`, index running across the page.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Short human-readable label derived from the content.
    pub label: String,
    /// Page URL this section was extracted from.
    pub source_url: String,
    pub content: SectionContent,
    /// Serialized markup of the section, capped at 1000 characters.
    pub raw_html: String,
    /// Whether `raw_html` was cut off at the cap.
    pub truncated: bool,
}

/// Page-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub title: String,
    pub description: String,
    pub language: String,
    pub canonical: Option<String>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            language: "en".to_string(),
            canonical: None,
        }
    }
}

/// Record of what the browser session did to coax content out of the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interactions {
    /// Identifiers of elements that were clicked, in click order.
    pub clicks: Vec<String>,
    /// Number of scroll-to-bottom attempts performed.
    pub scrolls: u32,
    /// Distinct page URLs visited, starting with the requested URL.
    pub pages: Vec<String>,
}

impl Interactions {
    pub fn new(url: &str) -> Self {
        Self {
            clicks: Vec::new(),
            scrolls: 0,
            pages: vec![url.to_string()],
        }
    }
}

/// A non-fatal error recorded during the scrape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub phase: Phase,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>, phase: Phase) -> Self {
        Self {
            message: message.into(),
            phase,
        }
    }
}

impl From<&crate::error::ScrapeError> for ErrorRecord {
    fn from(e: &crate::error::ScrapeError) -> Self {
        Self::new(e.to_string(), e.phase())
    }
}

/// Complete outcome of scraping one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// The requested URL.
    pub url: String,
    /// ISO-8601 UTC timestamp of when the scrape finished.
    pub scraped_at: String,
    pub meta: Meta,
    /// Empty only when the scrape failed before extraction; a successful
    /// extraction always yields at least a placeholder section.
    pub sections: Vec<Section>,
    pub interactions: Interactions,
    pub errors: Vec<ErrorRecord>,
}
