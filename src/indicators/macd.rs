// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
//   macd   = EMA(fast) - EMA(slow)
//   signal = EMA(signal_period) of macd
//   hist   = macd - signal
//
// The MACD line is undefined while either EMA is still warming up. The signal
// line needs `signal_period` defined MACD values before its first output, so
// with 12/26/9 the first signal lands at index 26 + 9 - 2 = 33.
// =============================================================================

use super::ema::{calculate_ema, ema_of_defined};
use super::IndicatorValue;

/// MACD line, signal line and histogram, each aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<IndicatorValue>,
    pub signal: Vec<IndicatorValue>,
    pub hist: Vec<IndicatorValue>,
}

/// Compute MACD for `closes`.
///
/// `hist` is derived as `macd - signal` at each index where both exist, never
/// computed independently.
///
/// # Panics
/// When any period is zero.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let macd: Vec<IndicatorValue> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal_line = ema_of_defined(&macd, signal);

    let hist = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        hist,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_all_series_same_length() {
        let out = calculate_macd(&ascending(50), 12, 26, 9);
        assert_eq!(out.macd.len(), 50);
        assert_eq!(out.signal.len(), 50);
        assert_eq!(out.hist.len(), 50);
    }

    #[test]
    fn macd_warm_up_boundaries() {
        let out = calculate_macd(&ascending(50), 12, 26, 9);
        assert!(out.macd[..25].iter().all(Option::is_none));
        assert!(out.macd[25].is_some());
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33].is_some());
        assert!(out.hist[..33].iter().all(Option::is_none));
        assert!(out.hist[33].is_some());
    }

    #[test]
    fn macd_hist_identity() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            if let (Some(m), Some(s), Some(h)) = (out.macd[i], out.signal[i], out.hist[i]) {
                assert_eq!(h, m - s, "hist identity broken at {i}");
            }
        }
    }

    #[test]
    fn macd_positive_and_non_decreasing_on_linear_ramp() {
        // SMA-seeded EMAs lag a linear ramp by exactly (w - 1) / 2 steps, so
        // the MACD line sits at (26 - 12) / 2 = 7 from its first value on.
        let out = calculate_macd(&ascending(30), 12, 26, 9);
        let defined: Vec<f64> = out.macd.iter().flatten().copied().collect();
        assert_eq!(defined.len(), 5);
        for pair in defined.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9, "MACD decreasing: {pair:?}");
        }
        for m in defined {
            assert!((m - 7.0).abs() < 1e-9, "expected 7.0, got {m}");
        }
    }

    #[test]
    fn macd_increasing_on_accelerating_uptrend() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 * 1.02_f64.powi(i)).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        let defined: Vec<f64> = out.macd.iter().flatten().copied().collect();
        assert!(defined.iter().all(|m| *m > 0.0));
        for pair in defined.windows(2) {
            assert!(pair[1] > pair[0], "MACD not increasing: {pair:?}");
        }
    }

    #[test]
    fn macd_flat_is_zero() {
        let out = calculate_macd(&vec![100.0; 40], 12, 26, 9);
        for v in out.macd.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
        for v in out.hist.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
    }

    #[test]
    fn macd_short_series_all_undefined() {
        let out = calculate_macd(&ascending(20), 12, 26, 9);
        assert!(out.macd.iter().all(Option::is_none));
        assert!(out.signal.iter().all(Option::is_none));
    }
}
