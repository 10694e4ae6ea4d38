//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `BrowserTab` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide).

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// Outcome of a navigation or idle wait.
///
/// A timeout is not a failure: the tab keeps whatever DOM loaded before
/// the deadline, and callers decide whether that is good enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    /// The page finished loading within the deadline.
    Complete,
    /// The deadline passed first.
    TimedOut,
}

/// A browser engine that can open tabs.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a new tab.
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently open tabs.
    fn active_tabs(&self) -> usize;
}

/// A single browser tab.
#[async_trait]
pub trait BrowserTab: Send + Sync {
    /// Navigate to a URL, waiting for the load event up to a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavStatus>;
    /// Execute JavaScript in the page and return the result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
    /// Get the full serialized page HTML.
    async fn content(&self) -> Result<String>;
    /// Get the current URL.
    async fn current_url(&self) -> Result<String>;
    /// Wait for an in-page navigation to settle, bounded by a timeout.
    async fn wait_for_idle(&self, timeout_ms: u64) -> Result<NavStatus>;
    /// Close this tab.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A renderer used when no browser is available.
///
/// Static fetching and extraction work without a browser; only pages
/// that genuinely need rendering degrade. Tab creation always fails,
/// which callers surface as a render-phase error.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>> {
        Err(anyhow::anyhow!("browser not available, static-only mode"))
    }
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
    fn active_tabs(&self) -> usize {
        0
    }
}
