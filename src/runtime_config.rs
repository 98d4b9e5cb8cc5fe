// =============================================================================
// Runtime Configuration — dashboard server settings
// =============================================================================
//
// Loaded once at startup from a JSON file, then overridden by environment
// variables.  All fields carry `#[serde(default)]` so that a partial (or
// empty) file still loads.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coingecko::client::DEFAULT_BASE_URL;
use crate::indicators::DEFAULT_WINDOW;
use crate::types::{MAX_DAYS, MIN_DAYS};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";
/// Config file used when `DASHBOARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_indicator_window() -> usize {
    DEFAULT_WINDOW
}

fn default_days() -> u32 {
    30
}

fn default_table_rows() -> usize {
    5
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// CoinGecko API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Look-back window for both SMA and RSI.
    #[serde(default = "default_indicator_window")]
    pub indicator_window: usize,

    /// Day count preselected on the dashboard slider.
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Rows shown in the historical-data table.
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,

    /// Upstream request timeout. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_base_url: default_api_base_url(),
            indicator_window: default_indicator_window(),
            default_days: default_days(),
            table_rows: default_table_rows(),
            request_timeout_secs: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            window = config.indicator_window,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `DASHBOARD_BIND_ADDR` and `COINGECKO_BASE_URL` overrides, using
    /// `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DASHBOARD_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("COINGECKO_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.indicator_window > 0, "indicator_window must be at least 1");
        ensure!(self.table_rows > 0, "table_rows must be at least 1");
        ensure!(
            (MIN_DAYS..=MAX_DAYS).contains(&self.default_days),
            "default_days must be between {MIN_DAYS} and {MAX_DAYS}, got {}",
            self.default_days
        );
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
