//! Shared DOM helpers used by detection, extraction, and metadata parsing.

use scraper::ElementRef;

/// Collect an element's text nodes into a single whitespace-flattened string.
///
/// Runs of whitespace (including newlines from pretty-printed markup)
/// collapse to single spaces.
pub fn flatten_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a possibly-relative href/src against a base URL.
///
/// Returns `None` when the base cannot be parsed or the join fails, so
/// callers drop the item instead of emitting a malformed URL.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    url::Url::parse(base)
        .ok()?
        .join(href)
        .ok()
        .map(|u| u.to_string())
}
