// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. This layer only translates HTTP to the
// indicator pipeline and back: it picks the config, applies display rounding
// to the serialized copy, and maps pipeline errors to status codes.
//
// CORS is configured permissively for the browser dashboard.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::assembler::{compute_from_raw_rows, FeatureRow};
use crate::error::Error;
use crate::indicators::IndicatorConfig;
use crate::market_data::RawRow;
use crate::twse::client::is_valid_stock_code;

/// Upper bound on requested display precision.
const MAX_PRECISION: u32 = 10;

/// Taipei is UTC+8 with no daylight saving.
const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

type ApiError = (StatusCode, Json<serde_json::Value>);

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/indicator-config", get(indicator_config))
        .route("/api/v1/indicators", post(compute_from_rows))
        .route("/api/v1/stock/:code/indicators", get(stock_indicators))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    requests_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        requests_served: state.requests_served(),
        server_time: Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Indicator config
// =============================================================================

async fn indicator_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.indicators.clone())
}

// =============================================================================
// Indicators from caller-supplied rows
// =============================================================================

#[derive(Deserialize)]
struct ComputeRequest {
    rows: Vec<RawRow>,
    #[serde(default)]
    config: Option<IndicatorConfig>,
    #[serde(default)]
    precision: Option<u32>,
}

#[derive(Serialize)]
struct IndicatorsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    stock_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    count: usize,
    rows: Vec<FeatureRow>,
}

async fn compute_from_rows(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    state.record_request();

    let Json(req) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(serde_json::json!({
                "error": "bad_request",
                "message": rejection.body_text(),
            })),
        )
    })?;

    let config = req.config.as_ref().unwrap_or(&state.config.indicators);
    let precision = resolve_precision(req.precision, state.config.display_precision)?;

    let rows = compute_from_raw_rows(&req.rows, config).map_err(|e| pipeline_error(&e))?;
    info!(input_rows = req.rows.len(), output_rows = rows.len(), "indicators computed");

    Ok(Json(IndicatorsResponse {
        stock_code: None,
        title: None,
        count: rows.len(),
        rows: display(rows, precision),
    }))
}

// =============================================================================
// Indicators for an exchange-listed stock
// =============================================================================

#[derive(Deserialize)]
struct DisplayParams {
    #[serde(default)]
    precision: Option<u32>,
}

async fn stock_indicators(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(params): Query<DisplayParams>,
) -> Result<impl IntoResponse, ApiError> {
    state.record_request();

    let code = code.trim().to_uppercase();
    if !is_valid_stock_code(&code) {
        return Err(bad_request(format!("invalid stock code {code:?}")));
    }
    let precision = resolve_precision(params.precision, state.config.display_precision)?;

    let today = taipei_today();
    let history = state
        .twse
        .fetch_history(&code, state.config.history_months, today)
        .await
        .map_err(|e| {
            warn!(stock_code = %code, error = %e, "upstream history fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "upstream_unavailable",
                    "message": format!("{e:#}"),
                })),
            )
        })?;

    let rows = compute_from_raw_rows(&history.rows, &state.config.indicators)
        .map_err(|e| pipeline_error(&e))?;
    info!(stock_code = %code, bars = rows.len(), "stock indicators computed");

    Ok(Json(IndicatorsResponse {
        stock_code: Some(history.stock_code),
        title: Some(history.title),
        count: rows.len(),
        rows: display(rows, precision),
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Current calendar date on the exchange's clock.
fn taipei_today() -> NaiveDate {
    match FixedOffset::east_opt(TAIPEI_OFFSET_SECS) {
        Some(taipei) => Utc::now().with_timezone(&taipei).date_naive(),
        None => Utc::now().date_naive(),
    }
}

fn resolve_precision(requested: Option<u32>, default: Option<u32>) -> Result<Option<u32>, ApiError> {
    match requested.or(default) {
        Some(p) if p > MAX_PRECISION => Err(bad_request(format!(
            "precision must be at most {MAX_PRECISION}, got {p}"
        ))),
        other => Ok(other),
    }
}

fn display(rows: Vec<FeatureRow>, precision: Option<u32>) -> Vec<FeatureRow> {
    match precision {
        Some(p) => rows.iter().map(|r| r.rounded(p)).collect(),
        None => rows,
    }
}

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "bad_request", "message": message })),
    )
}

/// Map a pipeline error to a structured response.
fn pipeline_error(err: &Error) -> ApiError {
    let status = match err {
        Error::InsufficientData { .. } | Error::InsufficientHistory { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::InvalidConfig(_) => StatusCode::BAD_REQUEST,
    };

    let mut body = serde_json::json!({
        "error": err.kind(),
        "message": err.to_string(),
    });
    if let Error::InsufficientHistory { required, actual } = err {
        body["required"] = (*required).into();
        body["actual"] = (*actual).into();
    }

    (status, Json(body))
}
