//! `pagesift scrape <url>` — one-shot scrape printed as JSON.

use crate::config::EngineConfig;
use crate::engine::{self, ScrapeEngine};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Run the scrape command.
///
/// The result JSON goes to stdout (or `output` when given); progress
/// and warnings go to stderr so the output stays pipeable.
pub async fn run(url: &str, pretty: bool, output: Option<&Path>) -> Result<()> {
    engine::validate_url(url)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("scraping {url}"));

    let config = EngineConfig::load()?;
    let engine = match ChromiumRenderer::new(&config).await {
        Ok(renderer) => {
            let renderer: Arc<dyn Renderer> = Arc::new(renderer);
            ScrapeEngine::new(config).with_renderer(renderer)
        }
        Err(e) => {
            spinner.println(format!("warning: browser unavailable ({e}), static fetch only"));
            ScrapeEngine::new(config)
        }
    };

    let result = engine.scrape(url).await;
    spinner.finish_and_clear();

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "wrote {} sections to {}",
                result.sections.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
