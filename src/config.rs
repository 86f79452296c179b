//! Runtime configuration for the scraper.
//!
//! Values come from an optional YAML file (`--config`), and individual
//! fields can then be overridden from the command line. Any field missing
//! from the file keeps its default.
//!
//! ```yaml
//! base_url: https://country-leaders.onrender.com
//! request_timeout_secs: 30
//! max_concurrency: 8
//! user_agent: country_leaders/0.1
//! ```

use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

/// Public deployment of the country-leaders API.
pub const DEFAULT_BASE_URL: &str = "https://country-leaders.onrender.com";

/// Runtime settings, read from YAML and overridable from the command line.
///
/// Every key is optional; missing keys take the [`Default`] values.
///
/// ```yaml
/// base_url: "https://country-leaders.onrender.com"
/// request_timeout_secs: 30
/// max_concurrency: 8
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Root of the country-leaders API.
    pub base_url: String,
    /// Applied to every request, API and Wikipedia alike.
    pub request_timeout_secs: u64,
    /// Upper bound on in-flight article fetches in concurrent mode.
    /// `None` means one per available CPU.
    pub max_concurrency: Option<usize>,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            max_concurrency: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ScraperConfig {
    /// `request_timeout_secs` as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pool size for concurrent enrichment, never below 1.
    pub fn worker_count(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1)
    }

    /// Build the HTTP client shared by the session, the API client and the
    /// article fetcher.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| ScraperError::transport("client builder", e))
    }
}

/// Load a [`ScraperConfig`] from a YAML file.
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<ScraperConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| ScraperError::Config {
        path: path.to_string(),
        source: Box::new(e),
    })?;
    let config = parse_config(&raw).map_err(|e| ScraperError::Config {
        path: path.to_string(),
        source: Box::new(e),
    })?;
    info!(base_url = %config.base_url, "Loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> std::result::Result<ScraperConfig, serde_yaml::Error> {
    // An empty file deserializes to unit, not to an empty map.
    if raw.trim().is_empty() {
        return Ok(ScraperConfig::default());
    }
    serde_yaml::from_str(raw)
}
