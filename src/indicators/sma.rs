// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = (x_{t-w+1} + ... + x_t) / w
//
// Every window is summed from scratch rather than maintained as a running
// sum, so the value at each index is exactly the mean of its w inputs with no
// drift carried over from earlier windows.
//
// Used for ma5/10/20/60, volume_ma5/10, the Bollinger middle band and the
// stochastic %K / %D smoothing.
// =============================================================================

use super::IndicatorValue;

/// Compute the SMA series for `values` over `period`.
///
/// The output has the same length as `values`; index `i` holds the mean of
/// `values[i + 1 - period..=i]`.
///
/// # Edge cases
/// - `i < period - 1` => `None` (warm-up)
/// - A non-finite mean => `None` at that index only
///
/// # Panics
/// When `period == 0`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<IndicatorValue> {
    assert!(period > 0, "SMA period must be non-zero");

    let mut result = vec![None; values.len()];
    if values.len() < period {
        return result;
    }

    let period_f = period as f64;
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period_f;
        if mean.is_finite() {
            result[i] = Some(mean);
        }
    }

    result
}

/// SMA over a series that may itself contain undefined values.
///
/// An output is defined only when all `period` inputs of its window are
/// defined.
///
/// # Panics
/// When `period == 0`.
pub fn sma_of_defined(values: &[IndicatorValue], period: usize) -> Vec<IndicatorValue> {
    assert!(period > 0, "SMA period must be non-zero");

    let mut result = vec![None; values.len()];
    if values.len() < period {
        return result;
    }

    let period_f = period as f64;
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        result[i] = sum.map(|s| s / period_f).filter(|m| m.is_finite());
    }

    result
}
