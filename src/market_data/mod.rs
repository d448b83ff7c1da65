pub mod normalizer;
pub mod series;

// Re-export the series types for convenient access (e.g. `use crate::market_data::PriceBar`).
pub use normalizer::{normalize_rows, RawRow};
pub use series::{PriceBar, PriceSeries};
