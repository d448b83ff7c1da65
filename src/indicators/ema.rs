// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = x_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period`
// inputs. Not exported as a feature on its own; MACD is built from it.
// =============================================================================

use super::IndicatorValue;

/// Compute the EMA series for `closes` over `period`.
///
/// The output is aligned with the input: the first defined value sits at
/// index `period - 1`.
///
/// # Edge cases
/// - `closes.len() < period` => all `None`
/// - A non-finite intermediate value stops the series; the remaining indices
///   stay `None`.
///
/// # Panics
/// When `period == 0`.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<IndicatorValue> {
    let wrapped: Vec<IndicatorValue> = closes.iter().copied().map(Some).collect();
    ema_of_defined(&wrapped, period)
}

/// EMA over a series whose leading values may be undefined (e.g. MACD line).
///
/// The seed is the mean of the first `period` consecutive defined values. A
/// gap before the seed is complete restarts seeding; a gap after it ends the
/// series.
///
/// # Panics
/// When `period == 0`.
pub fn ema_of_defined(values: &[IndicatorValue], period: usize) -> Vec<IndicatorValue> {
    assert!(period > 0, "EMA period must be non-zero");

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = vec![None; values.len()];

    let mut seed_sum = 0.0_f64;
    let mut seed_len = 0usize;
    let mut prev_ema: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        match (*value, prev_ema) {
            (Some(x), Some(prev)) => {
                let ema = x * multiplier + prev * (1.0 - multiplier);
                if !ema.is_finite() {
                    // Downstream consumers should not trust a broken series.
                    break;
                }
                result[i] = Some(ema);
                prev_ema = Some(ema);
            }
            (Some(x), None) => {
                seed_sum += x;
                seed_len += 1;
                if seed_len == period {
                    let sma = seed_sum / period as f64;
                    if !sma.is_finite() {
                        break;
                    }
                    result[i] = Some(sma);
                    prev_ema = Some(sma);
                }
            }
            (None, Some(_)) => break,
            (None, None) => {
                seed_sum = 0.0;
                seed_len = 0;
            }
        }
    }

    result
}
