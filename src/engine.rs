//! End-to-end scrape orchestration.
//!
//! Sequences static fetch, rendering-need detection, optional browser
//! rendering with interaction simulation, and section extraction into a
//! single best-effort pipeline. Pipeline failures downgrade the result
//! instead of propagating: callers always receive a well-formed
//! `ScrapeResult`, possibly with empty sections and accumulated errors.
//! The only hard rejection is an invalid URL, checked before anything
//! touches the network.

use crate::config::EngineConfig;
use crate::detect;
use crate::error::{Phase, ScrapeError};
use crate::extract;
use crate::fetch::StaticFetcher;
use crate::interact;
use crate::model::{ErrorRecord, Interactions, Meta, ScrapeResult};
use crate::renderer::Renderer;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Check that a URL is scrapeable before any network activity.
pub fn validate_url(url: &str) -> Result<(), ScrapeError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ScrapeError::InvalidUrl(url.to_string()))
    }
}

/// Mutable accumulation for one scrape call, owned by that call alone.
struct ScrapeContext {
    interactions: Interactions,
    errors: Vec<ErrorRecord>,
}

/// The adaptive scrape engine.
///
/// Fetches statically first; a heuristic over the static document
/// decides whether to redo the page in a headless browser with
/// interaction simulation before extracting sections.
pub struct ScrapeEngine {
    fetcher: StaticFetcher,
    renderer: Option<Arc<dyn Renderer>>,
    config: EngineConfig,
}

impl ScrapeEngine {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = StaticFetcher::new(&config);
        Self {
            fetcher,
            renderer: None,
            config,
        }
    }

    /// Attach a browser renderer for pages that need script execution.
    ///
    /// Without one, pages flagged by the heuristic degrade to static
    /// extraction with a render-phase error recorded.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Scrape one page end to end.
    ///
    /// The URL must already be validated via [`validate_url`].
    pub async fn scrape(&self, url: &str) -> ScrapeResult {
        let mut ctx = ScrapeContext {
            interactions: Interactions::new(url),
            errors: Vec::new(),
        };

        let static_html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%url, "static fetch failed: {e}");
                ctx.errors.push(ErrorRecord::from(&e));
                return self.partial_result(url, ctx);
            }
        };

        if !detect::needs_rendering(&static_html) {
            debug!(%url, "static content sufficient");
            return self.extract_stage(url, static_html, ctx).await;
        }

        info!(%url, "switching to browser rendering");
        ctx.errors.push(ErrorRecord::new(
            "Static content insufficient, using JS rendering",
            Phase::Detection,
        ));

        let html = match &self.renderer {
            None => {
                warn!(%url, "no browser available, extracting static snapshot");
                ctx.errors.push(ErrorRecord::new(
                    "browser rendering unavailable, extracted static content",
                    Phase::Render,
                ));
                static_html
            }
            Some(renderer) => {
                match self.render_page(renderer.as_ref(), url, &mut ctx).await {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(%url, "rendering failed: {e}");
                        ctx.errors
                            .push(ErrorRecord::new(e.to_string(), Phase::Render));
                        return self.partial_result(url, ctx);
                    }
                }
            }
        };

        self.extract_stage(url, html, ctx).await
    }

    /// Run the rendered fetch inside a scoped tab.
    ///
    /// The tab is closed on every path out of this function; nothing
    /// may return between `new_tab` and `close`.
    async fn render_page(
        &self,
        renderer: &dyn Renderer,
        url: &str,
        ctx: &mut ScrapeContext,
    ) -> anyhow::Result<String> {
        let mut tab = renderer.new_tab().await?;

        let outcome =
            interact::simulate(tab.as_mut(), url, &self.config, &mut ctx.interactions).await;

        if let Err(e) = tab.close().await {
            debug!("tab close failed: {e}");
        }

        let outcome = outcome?;
        if outcome.nav_timed_out {
            ctx.errors.push(ErrorRecord::from(&ScrapeError::NavTimeout(
                self.config.nav_timeout_ms,
            )));
        }
        Ok(outcome.html)
    }

    /// Parse and extract on the blocking pool, then assemble the result.
    async fn extract_stage(&self, url: &str, html: String, mut ctx: ScrapeContext) -> ScrapeResult {
        let source_url = url.to_string();
        let extracted =
            tokio::task::spawn_blocking(move || extract::extract_page(&html, &source_url)).await;

        match extracted {
            Ok(page) => ScrapeResult {
                url: url.to_string(),
                scraped_at: Utc::now().to_rfc3339(),
                meta: page.meta,
                sections: page.sections,
                interactions: ctx.interactions,
                errors: ctx.errors,
            },
            Err(e) => {
                warn!(%url, "extraction failed: {e}");
                ctx.errors.push(ErrorRecord::new(
                    format!("extraction failed: {e}"),
                    Phase::Scrape,
                ));
                self.partial_result(url, ctx)
            }
        }
    }

    /// The degraded result shape: no sections, default meta, everything
    /// accumulated so far preserved.
    fn partial_result(&self, url: &str, ctx: ScrapeContext) -> ScrapeResult {
        ScrapeResult {
            url: url.to_string(),
            scraped_at: Utc::now().to_rfc3339(),
            meta: Meta::default(),
            sections: Vec::new(),
            interactions: ctx.interactions,
            errors: ctx.errors,
        }
    }
}
