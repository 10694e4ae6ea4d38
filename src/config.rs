//! Engine configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Operational knobs for the scrape engine.
///
/// Selector patterns and detection thresholds are compile-time data in
/// their own modules; this struct only carries the values an operator
/// might reasonably tune per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Static HTTP fetch timeout in seconds (default: 30).
    pub static_timeout_secs: u64,

    /// Browser navigation ceiling in milliseconds (default: 30000).
    pub nav_timeout_ms: u64,

    /// Settle delay after navigation before interacting, in milliseconds
    /// (default: 2000).
    pub settle_ms: u64,

    /// Browser viewport width (default: 1920).
    pub viewport_width: u32,

    /// Browser viewport height (default: 1080).
    pub viewport_height: u32,

    /// User agent sent on both static fetches and rendered sessions.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            static_timeout_secs: 30,
            nav_timeout_ms: 30_000,
            settle_ms: 2_000,
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the JSON file named by `PAGESIFT_CONFIG`,
    /// or the defaults when the variable is unset. Fields missing from
    /// the file fall back to their defaults.
    pub fn load() -> Result<Self> {
        match std::env::var("PAGESIFT_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid config file {path}"))
            }
            Err(_) => Ok(Self::default()),
        }
    }
}
