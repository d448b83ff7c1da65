// =============================================================================
// Result Assembler — per-date feature rows
// =============================================================================
//
// Zips the price series with every indicator series into one `FeatureRow` per
// bar, in chronological order. Undefined readings stay `None` and serialize
// as JSON `null`; they are never coerced to 0 (a valid ATR / band value) or
// NaN (which poisons downstream arithmetic).
//
// Rounding for display is `FeatureRow::rounded`, applied by the caller to an
// already-computed row. Nothing inside the pipeline rounds.
// =============================================================================

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::indicators::{compute_indicator_set, IndicatorConfig, IndicatorValue};
use crate::market_data::{normalize_rows, PriceSeries};

/// One output record: the original OHLCV plus every indicator for that date.
///
/// Indicators keep the engine's id order, which is also their order in the
/// serialized object.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub indicators: Vec<(String, IndicatorValue)>,
}

impl FeatureRow {
    /// Reading for `id`; `None` both for undefined and for unknown ids.
    pub fn get(&self, id: &str) -> IndicatorValue {
        self.indicators
            .iter()
            .find(|(name, _)| name == id)
            .and_then(|(_, value)| *value)
    }

    /// Copy of this row with every number rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10_f64.powi(decimals as i32);
        let round = |x: f64| (x * factor).round() / factor;

        Self {
            date: self.date,
            open: round(self.open),
            high: round(self.high),
            low: round(self.low),
            close: round(self.close),
            volume: round(self.volume),
            indicators: self
                .indicators
                .iter()
                .map(|(id, v)| (id.clone(), v.map(round)))
                .collect(),
        }
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6 + self.indicators.len()))?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("open", &self.open)?;
        map.serialize_entry("high", &self.high)?;
        map.serialize_entry("low", &self.low)?;
        map.serialize_entry("close", &self.close)?;
        map.serialize_entry("volume", &self.volume)?;
        for (id, value) in &self.indicators {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// Compute every configured indicator over `series` and assemble one row per
/// bar, preserving input order.
///
/// # Errors
/// - [`crate::Error::InsufficientHistory`] when the series is shorter than the
///   longest configured window. No partial output is produced.
/// - [`crate::Error::InvalidConfig`] when `config` fails validation.
pub fn compute_indicators(series: &PriceSeries, config: &IndicatorConfig) -> Result<Vec<FeatureRow>> {
    let set = compute_indicator_set(series, config)?;

    let rows = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| FeatureRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            indicators: set
                .iter()
                .map(|s| (s.id.clone(), s.values[i]))
                .collect(),
        })
        .collect();

    Ok(rows)
}

/// Normalize raw exchange rows and compute features in one step.
///
/// # Errors
/// [`crate::Error::InsufficientData`] when no row parses, otherwise as
/// [`compute_indicators`].
pub fn compute_from_raw_rows<R, S>(rows: &[R], config: &IndicatorConfig) -> Result<Vec<FeatureRow>>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let series = normalize_rows(rows)?;
    compute_indicators(&series, config)
}
