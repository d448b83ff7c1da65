// =============================================================================
// Price series — typed daily OHLCV bars
// =============================================================================
//
// A `PriceSeries` is strictly increasing by date and immutable once built.
// Non-trading days are simply absent; nothing is resampled or filled.
// `low <= open, close <= high` is expected but deliberately not enforced:
// upstream data is passed through as-is.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered, date-unique sequence of [`PriceBar`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted ascending by date. When two bars share a date the one
    /// that appeared later in `bars` wins.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps input order among equal dates, so the last
        // occurrence of a date is the last element of its run.
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self { bars: deduped }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
