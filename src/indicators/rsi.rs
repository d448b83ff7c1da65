// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1: Compute price changes (deltas) from consecutive closes.
// Step 2: Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3: Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Convention: whenever avg_loss is zero the RSI is 100, including a perfectly
// flat market where avg_gain is zero as well.
// =============================================================================

use super::IndicatorValue;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The output is aligned with `closes`; index `period` is the first defined
/// value because `period` deltas are needed to seed the averages.
///
/// # Edge cases
/// - `closes.len() < period + 1` => all `None`
/// - If average loss is zero (no down moves), RSI is 100.0.
/// - A non-finite result ends the series; later indices stay `None`.
///
/// # Panics
/// When `period == 0`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<IndicatorValue> {
    assert!(period > 0, "RSI period must be non-zero");

    let mut result = vec![None; closes.len()];
    if closes.len() <= period {
        return result;
    }

    // --- Compute price deltas ------------------------------------------------
    // deltas[j] is the change from closes[j] to closes[j + 1].
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed averages with SMA of first `period` deltas ---------------------
    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => result[period] = Some(rsi),
        None => return result,
    }

    // --- Wilder's smoothing for subsequent values ----------------------------
    for (offset, &delta) in deltas[period..].iter().enumerate() {
        // NaN compares false both ways and would silently count as "no move".
        if !delta.is_finite() {
            break;
        }

        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result[period + 1 + offset] = Some(rsi),
            None => break,
        }
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Returns `None` when either average (and so the result) is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }

    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
