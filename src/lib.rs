// =============================================================================
// tw-stock-ta — technical indicators for Taiwan daily stock history
// =============================================================================
//
// Pipeline:
//
//   raw exchange rows ──► market_data::normalizer ──► PriceSeries
//                                                        │
//                     indicators::engine (SMA, RSI, MACD, Bollinger, KD,
//                                         ATR, Volume MA)
//                                                        │
//                                 assembler ──► Vec<FeatureRow>
//
// `twse` fetches raw rows from the exchange and `api` serves the pipeline
// over HTTP. The pipeline itself performs no I/O.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod assembler;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod twse;

pub use assembler::{compute_from_raw_rows, compute_indicators, FeatureRow};
pub use error::{Error, Result};
pub use indicators::{IndicatorConfig, IndicatorValue};
pub use market_data::{normalize_rows, PriceBar, PriceSeries};
