// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Read-only configuration plus the upstream client. The indicator pipeline
// itself is stateless, so nothing here needs a lock; the only mutable field
// is an atomic request counter reported by the health endpoint.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;

use crate::runtime_config::RuntimeConfig;
use crate::twse::TwseClient;

/// State shared across handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: RuntimeConfig,
    pub twse: TwseClient,
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let twse = TwseClient::new(
            config.twse_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            config,
            twse,
            requests_served: AtomicU64::new(0),
        })
    }

    /// Count one indicator request; returns the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
