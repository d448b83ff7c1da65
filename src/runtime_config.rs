// =============================================================================
// Runtime Configuration — service settings with atomic save
// =============================================================================
//
// Everything the indicator service needs at startup: where to listen, where
// the exchange lives, how much history to pull and which indicators to
// compute by default.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorConfig;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5788".to_string()
}

fn default_twse_base_url() -> String {
    "https://www.twse.com.tw".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_history_months() -> u32 {
    4
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the indicator service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Socket address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the exchange daily-history endpoint.
    #[serde(default = "default_twse_base_url")]
    pub twse_base_url: String,

    /// Upstream request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Calendar months of daily history to fetch per request. One month is
    /// roughly 20 trading days, so MA60 needs at least 3 full months.
    #[serde(default = "default_history_months")]
    pub history_months: u32,

    /// Decimal places applied to responses when the request does not ask for
    /// any. `None` returns full precision.
    #[serde(default)]
    pub display_precision: Option<u32>,

    /// Indicators computed when a request does not carry its own config.
    #[serde(default)]
    pub indicators: IndicatorConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            twse_base_url: default_twse_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            history_months: default_history_months(),
            display_precision: None,
            indicators: IndicatorConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning. The indicator section is validated before returning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config.validate()?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            history_months = config.history_months,
            required_bars = config.indicators.required_bars(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Load `path`, or write the defaults there when it does not exist yet so
    /// operators get an editable file on first start.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        info!(path = %path.display(), "no runtime config found, wrote defaults");
        Ok(config)
    }

    /// Check the settings that would otherwise only fail on first request.
    pub fn validate(&self) -> Result<()> {
        self.indicators
            .validate()
            .context("invalid indicators section")?;
        if self.history_months == 0 {
            anyhow::bail!("history_months must be at least 1");
        }
        Ok(())
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
