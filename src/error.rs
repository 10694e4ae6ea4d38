//! Error types for the scrape pipeline.
//!
//! Failures during a scrape do not abort the request. The engine converts
//! them into [`Phase`]-tagged records on the result and keeps going with
//! whatever it has. Only URL validation rejects a request outright.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a recorded error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Fetch,
    Detection,
    Render,
    Scrape,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetch => "fetch",
            Self::Detection => "detection",
            Self::Render => "render",
            Self::Scrape => "scrape",
        };
        write!(f, "{s}")
    }
}

/// All errors that can occur while scraping a page.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("invalid URL: {0} (must start with http:// or https://)")]
    InvalidUrl(String),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("navigation timed out after {0}ms")]
    NavTimeout(u64),

    #[error("render failed: {0}")]
    Render(String),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl ScrapeError {
    /// Pipeline phase this error is recorded under.
    pub fn phase(&self) -> Phase {
        match self {
            ScrapeError::InvalidUrl(_) => Phase::Fetch,
            ScrapeError::Fetch(_) => Phase::Fetch,
            ScrapeError::NavTimeout(_) => Phase::Render,
            ScrapeError::Render(_) => Phase::Render,
            ScrapeError::Extraction(_) => Phase::Scrape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display_lowercase() {
        assert_eq!(Phase::Fetch.to_string(), "fetch");
        assert_eq!(Phase::Detection.to_string(), "detection");
        assert_eq!(Phase::Render.to_string(), "render");
        assert_eq!(Phase::Scrape.to_string(), "scrape");
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Detection).unwrap();
        assert_eq!(json, "\"detection\"");
    }

    #[test]
    fn test_error_phase_mapping() {
        assert_eq!(
            ScrapeError::NavTimeout(30_000).phase(),
            Phase::Render
        );
        assert_eq!(
            ScrapeError::Extraction("boom".into()).phase(),
            Phase::Scrape
        );
        assert_eq!(
            ScrapeError::InvalidUrl("ftp://x".into()).phase(),
            Phase::Fetch
        );
    }

    #[test]
    fn test_error_messages() {
        let e = ScrapeError::NavTimeout(30_000);
        assert_eq!(e.to_string(), "navigation timed out after 30000ms");

        let e = ScrapeError::Render("target crashed".into());
        assert!(e.to_string().contains("target crashed"));
    }
}
