// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the daily-chart indicators. Every
// function returns a series as long as its input, holding `None` wherever a
// window lacks history or a value would be undefined. Zero and NaN are never
// used as stand-ins for "no value".

pub mod atr;
pub mod bollinger;
pub mod config;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

/// A single indicator reading: a number, or `None` while undefined.
pub type IndicatorValue = Option<f64>;

pub use config::{BollingerParams, IndicatorConfig, MacdParams, StochasticParams};
pub use engine::{compute_indicator_set, IndicatorSeries, IndicatorSet};
