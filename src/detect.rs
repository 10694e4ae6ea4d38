//! Decide whether a statically fetched page needs browser rendering.
//!
//! Pure predicate over the raw HTML. Nothing here touches the network;
//! the engine calls this once on the static fetch result and switches to
//! the rendered strategy when it fires.

use crate::dom;
use scraper::{Html, Selector};

/// Minimum flattened body text length for a page to count as server-rendered.
pub const MIN_BODY_TEXT: usize = 200;

/// Minimum flattened text inside an SPA mount node for it to count as hydrated.
pub const MIN_MOUNT_TEXT: usize = 100;

/// Raw-markup substrings that mark client-side frameworks.
pub const SPA_FINGERPRINTS: &[&str] = &[
    "id=\"root\"",
    "id=\"__next\"",
    "id=\"app\"",
    "data-reactroot",
    "ng-app",
];

/// Mount containers rechecked for emptiness when a fingerprint is present.
pub const MOUNT_SELECTORS: &[&str] = &["#root", "#__next", "#app"];

/// Returns true when the static document is too empty to extract from
/// and the page should be re-fetched through the browser.
pub fn needs_rendering(html: &str) -> bool {
    let doc = Html::parse_document(html);

    let body_sel = Selector::parse("body").unwrap();
    let body = match doc.select(&body_sel).next() {
        Some(b) => b,
        None => return true,
    };

    let body_text = dom::flatten_text(body);
    if body_text.chars().count() < MIN_BODY_TEXT {
        return true;
    }

    // Framework shell with an unhydrated mount node: plenty of markup,
    // but the app container itself is still empty.
    if SPA_FINGERPRINTS.iter().any(|m| html.contains(m)) {
        for sel_str in MOUNT_SELECTORS {
            if let Ok(sel) = Selector::parse(sel_str) {
                if let Some(el) = doc.select(&sel).next() {
                    if dom::flatten_text(el).chars().count() < MIN_MOUNT_TEXT {
                        return true;
                    }
                }
            }
        }
    }

    false
}
