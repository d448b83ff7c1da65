// =============================================================================
// Stochastic Oscillator (KD)
// =============================================================================
//
//   rawK_t = 100 * (close_t - LL) / (HH - LL)
//            LL = lowest low, HH = highest high over the last `fastk` bars
//   %K     = SMA(smooth_k) of rawK
//   %D     = SMA(smooth_d) of %K
//
// A window with no trading range (HH == LL) has no meaningful rawK; it is
// reported as undefined instead of dividing by zero, and the gap propagates
// into every %K / %D window that covers it.
// =============================================================================

use super::sma::sma_of_defined;
use super::IndicatorValue;
use crate::market_data::PriceBar;

/// Raw %K, smoothed %K and %D, aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub raw_k: Vec<IndicatorValue>,
    pub k: Vec<IndicatorValue>,
    pub d: Vec<IndicatorValue>,
}

/// Compute the slow stochastic oscillator over `bars`.
///
/// With 9/3/3 the first rawK is at index 8, %K at 10 and %D at 12.
///
/// # Panics
/// When any period is zero.
pub fn calculate_stochastic(
    bars: &[PriceBar],
    fastk: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> StochasticSeries {
    assert!(fastk > 0, "stochastic fastk period must be non-zero");

    let mut raw_k = vec![None; bars.len()];
    if bars.len() >= fastk {
        for i in (fastk - 1)..bars.len() {
            let window = &bars[i + 1 - fastk..=i];
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let range = highest - lowest;

            if range == 0.0 || !range.is_finite() {
                continue;
            }

            let value = 100.0 * (bars[i].close - lowest) / range;
            if value.is_finite() {
                raw_k[i] = Some(value);
            }
        }
    }

    let k = sma_of_defined(&raw_k, smooth_k);
    let d = sma_of_defined(&k, smooth_d);

    StochasticSeries { raw_k, k, d }
}
