// =============================================================================
// Indicator Engine — run an IndicatorConfig over a PriceSeries
// =============================================================================
//
// Produces one named series per requested indicator, each exactly as long as
// the input. Stateless: the same series and config always give bit-identical
// output, so concurrent callers need no coordination.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::atr::calculate_atr;
use super::bollinger::calculate_bollinger;
use super::config::IndicatorConfig;
use super::macd::calculate_macd;
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use super::stochastic::calculate_stochastic;
use super::IndicatorValue;
use crate::error::{Error, Result};
use crate::market_data::PriceSeries;

/// One named indicator series, aligned index-for-index with the price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub id: String,
    pub values: Vec<IndicatorValue>,
}

/// All indicator series of one computation, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    series: Vec<IndicatorSeries>,
}

impl IndicatorSet {
    fn push(&mut self, id: impl Into<String>, values: Vec<IndicatorValue>) {
        self.series.push(IndicatorSeries {
            id: id.into(),
            values,
        });
    }

    /// Look up a series by indicator id (e.g. `ma20`, `kd_d`).
    pub fn get(&self, id: &str) -> Option<&[IndicatorValue]> {
        self.series
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.values.as_slice())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Compute every indicator requested by `config` over `series`.
///
/// # Errors
/// - [`Error::InvalidConfig`] when `config` fails validation.
/// - [`Error::InsufficientHistory`] when `series` is shorter than
///   `config.required_bars()`.
pub fn compute_indicator_set(series: &PriceSeries, config: &IndicatorConfig) -> Result<IndicatorSet> {
    config.validate()?;

    let required = config.required_bars();
    if series.len() < required {
        return Err(Error::InsufficientHistory {
            required,
            actual: series.len(),
        });
    }

    let closes = series.closes();
    let volumes = series.volumes();
    let bars = series.bars();
    let mut set = IndicatorSet::default();

    for &w in &config.ma_windows {
        set.push(format!("ma{w}"), calculate_sma(&closes, w));
    }

    for &w in &config.rsi_windows {
        set.push(format!("rsi{w}"), calculate_rsi(&closes, w));
    }

    if let Some(p) = config.macd {
        let macd = calculate_macd(&closes, p.fast, p.slow, p.signal);
        set.push("macd", macd.macd);
        set.push("macd_signal", macd.signal);
        set.push("macd_hist", macd.hist);
    }

    if let Some(p) = config.bollinger {
        let bb = calculate_bollinger(&closes, p.window, p.k);
        set.push("boll_upper", bb.upper);
        set.push("boll_middle", bb.middle);
        set.push("boll_lower", bb.lower);
    }

    if let Some(p) = config.stochastic {
        let kd = calculate_stochastic(bars, p.fastk, p.smooth_k, p.smooth_d);
        set.push("kd_k", kd.k);
        set.push("kd_d", kd.d);
    }

    if let Some(w) = config.atr_window {
        set.push(format!("atr{w}"), calculate_atr(bars, w));
    }

    for &w in &config.volume_ma_windows {
        set.push(format!("volume_ma{w}"), calculate_sma(&volumes, w));
    }

    debug!(
        bars = series.len(),
        indicators = set.len(),
        "indicator set computed"
    );

    Ok(set)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PriceBar;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceBar {
                    date: start + chrono::Days::new(i as u64),
                    open: c,
                    high: c + 1.0,
                    low: c - 1.0,
                    close: c,
                    volume: 1000.0 + i as f64,
                })
                .collect(),
        )
    }

    #[test]
    fn default_ids_in_order() {
        let s = series(&vec![100.0; 60]);
        let set = compute_indicator_set(&s, &IndicatorConfig::default()).unwrap();
        let ids: Vec<&str> = set.ids().collect();
        assert_eq!(
            ids,
            vec![
                "ma5",
                "ma10",
                "ma20",
                "ma60",
                "rsi6",
                "rsi12",
                "macd",
                "macd_signal",
                "macd_hist",
                "boll_upper",
                "boll_middle",
                "boll_lower",
                "kd_k",
                "kd_d",
                "atr14",
                "volume_ma5",
                "volume_ma10",
            ]
        );
    }

    #[test]
    fn every_series_matches_input_length() {
        let closes: Vec<f64> = (0..75).map(|i| 100.0 + (i as f64).sin()).collect();
        let s = series(&closes);
        let set = compute_indicator_set(&s, &IndicatorConfig::default()).unwrap();
        for ind in set.iter() {
            assert_eq!(ind.values.len(), 75, "{} has wrong length", ind.id);
        }
    }

    #[test]
    fn short_series_is_insufficient_history() {
        let s = series(&vec![100.0; 59]);
        assert_eq!(
            compute_indicator_set(&s, &IndicatorConfig::default()),
            Err(Error::InsufficientHistory {
                required: 60,
                actual: 59
            })
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_computing() {
        let s = series(&vec![100.0; 60]);
        let cfg = IndicatorConfig {
            rsi_windows: vec![0],
            ..IndicatorConfig::default()
        };
        assert!(matches!(
            compute_indicator_set(&s, &cfg),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn volume_ma_uses_volume() {
        let s = series(&vec![100.0; 60]);
        let set = compute_indicator_set(&s, &IndicatorConfig::default()).unwrap();
        // volumes 1000, 1001, ..., mean of first five = 1002
        assert_eq!(set.get("volume_ma5").unwrap()[4], Some(1002.0));
        assert!(set.get("missing").is_none());
    }
}
