// =============================================================================
// tw-stock-ta — Main Entry Point
// =============================================================================
//
// Loads the runtime config, then serves the indicator API until Ctrl-C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tw_stock_ta::api;
use tw_stock_ta::app_state::AppState;
use tw_stock_ta::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "ta_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("tw-stock-ta starting up");

    let config_path =
        std::env::var("TA_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = RuntimeConfig::load_or_init(&config_path).unwrap_or_else(|e| {
        warn!(path = %config_path, error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("TA_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        twse = %config.twse_base_url,
        history_months = config.history_months,
        required_bars = config.indicators.required_bars(),
        "Indicator service configured"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
