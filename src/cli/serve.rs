//! Start the Pagesift HTTP server.

use crate::config::EngineConfig;
use crate::engine::ScrapeEngine;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the server until interrupted.
pub async fn run(port: u16) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagesift=info".parse().unwrap()),
        )
        .init();

    info!("starting pagesift v{}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load()?;

    // One browser instance serves all requests; each scrape opens its
    // own tab. Without a browser the engine still serves static pages.
    let engine = match ChromiumRenderer::new(&config).await {
        Ok(renderer) => {
            info!("Chromium renderer initialized");
            let renderer: Arc<dyn Renderer> = Arc::new(renderer);
            ScrapeEngine::new(config).with_renderer(renderer)
        }
        Err(e) => {
            warn!("Failed to initialize Chromium: {e}");
            warn!("Pages that need script execution will degrade to static extraction");
            ScrapeEngine::new(config)
        }
    };

    let state = Arc::new(AppState { engine });
    rest::start(port, state).await
}
