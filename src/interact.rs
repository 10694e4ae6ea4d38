//! Interaction simulation for rendered pages.
//!
//! Drives a live browser tab through noise removal, tab and "load more"
//! clicking, pagination, and infinite scroll to surface content that only
//! appears after interaction. Every step past the initial navigation is
//! best-effort: a failing step is logged and skipped, never fatal.
//!
//! Elements are located and clicked by injected JavaScript rather than
//! protocol-level element handles, so the whole protocol needs only
//! `evaluate` plus URL/idle access on the tab.

use crate::config::EngineConfig;
use crate::model::Interactions;
use crate::renderer::{BrowserTab, NavStatus};
use anyhow::Result;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

// ── Selector patterns ──────────────────────────────────────────────────

/// How an interaction step locates page elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// A plain CSS selector.
    Css(&'static str),
    /// Elements of `tag` whose text contains `needle`.
    ByText {
        tag: &'static str,
        needle: &'static str,
    },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(sel) => f.write_str(sel),
            Locator::ByText { tag, needle } => write!(f, "{tag}:has-text(\"{needle}\")"),
        }
    }
}

/// Overlay elements removed before any clicking.
pub const NOISE_SELECTORS: &[&str] = &[
    r#"[id*="cookie"]"#,
    r#"[class*="cookie"]"#,
    r#"[id*="banner"]"#,
    r#"[class*="banner"]"#,
    r#"[id*="modal"]"#,
    r#"[class*="modal"]"#,
    r#"[id*="popup"]"#,
    r#"[class*="popup"]"#,
    r#"[role="dialog"]"#,
    ".newsletter-popup",
    "#onetrust-banner-sdk",
];

/// Tab-like controls, tried in order until one matches more than once.
const TAB_PATTERNS: &[Locator] = &[
    Locator::Css(r#"[role="tab"]"#),
    Locator::Css("button[aria-controls]"),
    Locator::Css(".tab"),
    Locator::Css("[data-tab]"),
];

/// "Load more" style controls.
const LOAD_MORE_PATTERNS: &[Locator] = &[
    Locator::ByText {
        tag: "button",
        needle: "Load more",
    },
    Locator::ByText {
        tag: "button",
        needle: "Show more",
    },
    Locator::ByText {
        tag: "button",
        needle: "See more",
    },
    Locator::Css(r#"[class*="load-more"]"#),
    Locator::Css(r#"[class*="show-more"]"#),
];

/// Next-page links.
const NEXT_PATTERNS: &[Locator] = &[
    Locator::ByText {
        tag: "a",
        needle: "Next",
    },
    Locator::ByText {
        tag: "a",
        needle: "next",
    },
    Locator::Css(r#"[rel="next"]"#),
    Locator::Css(".pagination a:last-child"),
    Locator::Css(r#"a[aria-label*="next" i]"#),
];

const MAX_TAB_CLICKS: usize = 3;
const MAX_LOAD_MORE_ROUNDS: usize = 3;
const MAX_PAGINATION_ROUNDS: usize = 3;
const MAX_SCROLLS: usize = 3;

const CLICK_TIMEOUT_MS: u64 = 2_000;
const PAGINATION_CLICK_TIMEOUT_MS: u64 = 3_000;
const PAGINATION_IDLE_TIMEOUT_MS: u64 = 5_000;

const SETTLE_AFTER_TAB_MS: u64 = 1_000;
const SETTLE_AFTER_LOAD_MORE_MS: u64 = 1_500;
const SETTLE_AFTER_PAGE_MS: u64 = 1_000;
const SETTLE_AFTER_SCROLL_MS: u64 = 2_000;

const SCROLL_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight)";

// ── Injected scripts ───────────────────────────────────────────────────

/// JS expression selecting all elements a locator matches, as an array.
fn finder_js(loc: &Locator) -> String {
    match loc {
        Locator::Css(sel) => {
            format!(
                "[...document.querySelectorAll('{}')]",
                sanitize_js_string(sel)
            )
        }
        Locator::ByText { tag, needle } => format!(
            "[...document.querySelectorAll('{}')].filter(el => el.textContent.includes('{}'))",
            sanitize_js_string(tag),
            sanitize_js_string(needle)
        ),
    }
}

fn count_script(loc: &Locator) -> String {
    format!("{}.length", finder_js(loc))
}

fn click_script(loc: &Locator, index: usize) -> String {
    format!(
        r#"(() => {{
            const els = {};
            const el = els[{}];
            if (el) {{ el.click(); return {{ success: true }}; }}
            return {{ success: false }};
        }})()"#,
        finder_js(loc),
        index
    )
}

fn remove_script(selector: &str) -> String {
    format!(
        "document.querySelectorAll('{}').forEach(el => el.remove())",
        sanitize_js_string(selector)
    )
}

/// Sanitize a string for safe injection into a JavaScript string literal.
///
/// Escapes all characters that could break out of a JS string context:
/// - Backslashes, single/double quotes, backticks
/// - Newlines, carriage returns, tabs
/// - HTML script tags (to prevent XSS if value is reflected in HTML)
/// - Null bytes
fn sanitize_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}                       // Strip null bytes
            '<' => result.push_str("\\x3c"), // Prevent </script> injection
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}

// ── Tab helpers ────────────────────────────────────────────────────────

/// Run one best-effort step: a failure is logged at debug and ignored.
async fn best_effort<T>(step: &str, fut: impl Future<Output = Result<T>>) -> Option<T> {
    match fut.await {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("{step} skipped: {e}");
            None
        }
    }
}

async fn count_matches(tab: &dyn BrowserTab, loc: &Locator) -> Result<usize> {
    let value = tab.evaluate(&count_script(loc)).await?;
    Ok(value.as_u64().unwrap_or(0) as usize)
}

/// Click the n-th match of a locator, bounded by a timeout.
async fn click_nth(
    tab: &dyn BrowserTab,
    loc: &Locator,
    index: usize,
    timeout_ms: u64,
) -> Result<bool> {
    let script = click_script(loc, index);
    let value = match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tab.evaluate(&script),
    )
    .await
    {
        Ok(v) => v?,
        Err(_) => anyhow::bail!("click timed out after {timeout_ms}ms"),
    };

    Ok(value
        .as_object()
        .and_then(|o| o.get("success"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ── Interaction steps ──────────────────────────────────────────────────

/// Strip cookie banners, modals and similar overlays.
///
/// Failures are swallowed without a record: absent noise elements are
/// the common case, not an anomaly worth reporting.
async fn remove_noise(tab: &dyn BrowserTab) {
    for selector in NOISE_SELECTORS {
        best_effort("noise removal", tab.evaluate(&remove_script(selector))).await;
    }
}

/// Click the first few controls of the first tab pattern that matches
/// more than one element.
async fn click_tabs(tab: &dyn BrowserTab, clicks: &mut Vec<String>) {
    for loc in TAB_PATTERNS {
        let count = match best_effort("tab query", count_matches(tab, loc)).await {
            Some(n) => n,
            None => continue,
        };
        if count <= 1 {
            continue;
        }
        for i in 0..count.min(MAX_TAB_CLICKS) {
            let clicked = best_effort("tab click", click_nth(tab, loc, i, CLICK_TIMEOUT_MS))
                .await
                .unwrap_or(false);
            if clicked {
                sleep_ms(SETTLE_AFTER_TAB_MS).await;
                clicks.push(format!("{loc}[{i}]"));
            }
        }
        break;
    }
}

/// Repeatedly click "load more" controls, a few rounds per pattern.
///
/// A pattern's rounds end as soon as it stops matching or a click on it
/// fails, so a button that disappears after one click is clicked once.
async fn click_load_more(tab: &dyn BrowserTab, clicks: &mut Vec<String>) {
    for loc in LOAD_MORE_PATTERNS {
        for _round in 0..MAX_LOAD_MORE_ROUNDS {
            let found = match best_effort("load-more query", count_matches(tab, loc)).await {
                Some(n) => n > 0,
                None => false,
            };
            if !found {
                break;
            }
            match best_effort("load-more click", click_nth(tab, loc, 0, CLICK_TIMEOUT_MS)).await
            {
                Some(true) => {
                    sleep_ms(SETTLE_AFTER_LOAD_MORE_MS).await;
                    clicks.push(loc.to_string());
                }
                _ => break,
            }
        }
    }
}

/// Follow next-page links, falling back to infinite scroll.
///
/// Pagination stops on the first unchanged URL or failed click. Scroll
/// runs when pagination made no progress or fewer than three pages are
/// known, and counts attempts rather than detected content growth.
async fn paginate_or_scroll(tab: &dyn BrowserTab, interactions: &mut Interactions) {
    let mut current_url = match best_effort("url read", tab.current_url()).await {
        Some(u) => u,
        None => interactions.pages[0].clone(),
    };
    let mut advanced = false;

    'rounds: for _round in 0..MAX_PAGINATION_ROUNDS {
        let mut matched = false;
        for loc in NEXT_PATTERNS {
            let found = match best_effort("next query", count_matches(tab, loc)).await {
                Some(n) => n > 0,
                None => false,
            };
            if !found {
                continue;
            }
            matched = true;

            let clicked = best_effort(
                "next click",
                click_nth(tab, loc, 0, PAGINATION_CLICK_TIMEOUT_MS),
            )
            .await
            .unwrap_or(false);
            if !clicked {
                break 'rounds;
            }

            best_effort("idle wait", tab.wait_for_idle(PAGINATION_IDLE_TIMEOUT_MS)).await;

            let new_url = match best_effort("url read", tab.current_url()).await {
                Some(u) => u,
                None => break 'rounds,
            };
            if new_url == current_url {
                break 'rounds;
            }
            if !interactions.pages.contains(&new_url) {
                interactions.pages.push(new_url.clone());
                sleep_ms(SETTLE_AFTER_PAGE_MS).await;
            }
            current_url = new_url;
            advanced = true;
            continue 'rounds;
        }
        if !matched {
            break;
        }
    }

    if !advanced || interactions.pages.len() < 3 {
        for _ in 0..MAX_SCROLLS {
            if best_effort("scroll", tab.evaluate(SCROLL_BOTTOM_JS))
                .await
                .is_some()
            {
                sleep_ms(SETTLE_AFTER_SCROLL_MS).await;
                interactions.scrolls += 1;
            }
        }
    }
}

// ── Entry point ────────────────────────────────────────────────────────

/// What a simulation run produced.
#[derive(Debug)]
pub struct SimulationOutcome {
    /// Final rendered HTML snapshot.
    pub html: String,
    /// The initial navigation hit its deadline before the load event.
    pub nav_timed_out: bool,
}

/// Run the full interaction protocol against one tab.
///
/// Returns the final HTML snapshot even when intermediate steps failed.
/// Errors out only when navigation fails outright or the final snapshot
/// cannot be read.
pub async fn simulate(
    tab: &mut dyn BrowserTab,
    url: &str,
    config: &EngineConfig,
    interactions: &mut Interactions,
) -> Result<SimulationOutcome> {
    let status = tab.navigate(url, config.nav_timeout_ms).await?;
    let nav_timed_out = status == NavStatus::TimedOut;
    if nav_timed_out {
        debug!("navigation deadline hit, continuing with partial DOM");
    }
    sleep_ms(config.settle_ms).await;

    remove_noise(&*tab).await;
    click_tabs(&*tab, &mut interactions.clicks).await;
    click_load_more(&*tab, &mut interactions.clicks).await;
    paginate_or_scroll(&*tab, interactions).await;

    let html = tab.content().await?;
    Ok(SimulationOutcome { html, nav_timed_out })
}
