// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H_0 - L_0
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_period = SMA of TR_1 .. TR_period
//   ATR_t      = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// TR_0 has no previous close, so it does not enter the seed; the first ATR
// therefore appears at index `period`.
// =============================================================================

use super::IndicatorValue;
use crate::market_data::PriceBar;

/// True Range for every bar (oldest first).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let mut tr_values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let hl = bar.high - bar.low;
        if i == 0 {
            tr_values.push(hl);
            continue;
        }

        let prev_close = bars[i - 1].close;
        let hc = (bar.high - prev_close).abs();
        let lc = (bar.low - prev_close).abs();

        // f64::max discards NaN operands; keep bad bars visible instead.
        if hl.is_nan() || hc.is_nan() || lc.is_nan() {
            tr_values.push(f64::NAN);
        } else {
            tr_values.push(hl.max(hc).max(lc));
        }
    }
    tr_values
}

/// Compute the ATR series for `bars` using Wilder's smoothing.
///
/// # Edge cases
/// - `i < period` => `None`
/// - Fewer than `period + 1` bars => all `None`
/// - A non-finite value ends the series; later indices stay `None`.
///
/// # Panics
/// When `period == 0`.
pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Vec<IndicatorValue> {
    assert!(period > 0, "ATR period must be non-zero");

    let mut result = vec![None; bars.len()];
    if bars.len() <= period {
        return result;
    }

    let tr_values = true_range(bars);

    // --- Seed ATR with SMA of TR_1 ..= TR_period ------------------------------
    let period_f = period as f64;
    let seed: f64 = tr_values[1..=period].iter().sum::<f64>() / period_f;
    if !seed.is_finite() {
        return result;
    }
    result[period] = Some(seed);

    // --- Wilder's smoothing for remaining TR values ------------------------------
    let mut atr = seed;
    for i in (period + 1)..bars.len() {
        atr = (atr * (period_f - 1.0) + tr_values[i]) / period_f;
        if !atr.is_finite() {
            break;
        }
        result[i] = Some(atr);
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Build a test bar with the given OHLC values.
    fn candle(open: f64, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn atr_period_zero_panics() {
        let candles = vec![candle(100.0, 105.0, 95.0, 102.0); 20];
        calculate_atr(&candles, 0);
    }

    #[test]
    fn atr_insufficient_data() {
        // Need period + 1 = 15 candles for period=14, only have 14.
        let candles = vec![candle(100.0, 105.0, 95.0, 102.0); 14];
        assert!(calculate_atr(&candles, 14).iter().all(Option::is_none));
    }

    #[test]
    fn true_range_first_bar_is_high_minus_low() {
        let candles = vec![candle(100.0, 105.0, 95.0, 95.0), candle(110.0, 115.0, 108.0, 112.0)];
        let tr = true_range(&candles);
        assert_eq!(tr[0], 10.0);
        // Gap up: |115 - 95| = 20 > 115 - 108 = 7
        assert_eq!(tr[1], 20.0);
    }

    #[test]
    fn atr_exact_minimum_data() {
        // period=3, need 4 candles to get 3 TR values with a previous close.
        let candles = vec![
            candle(100.0, 102.0, 98.0, 101.0),
            candle(101.0, 104.0, 99.0, 103.0),
            candle(103.0, 106.0, 100.0, 105.0),
            candle(105.0, 108.0, 102.0, 107.0),
        ];
        let atr = calculate_atr(&candles, 3);
        assert!(atr[..3].iter().all(Option::is_none));
        // TR_1 = 5, TR_2 = 6, TR_3 = 6 => seed 17/3
        assert!((atr[3].unwrap() - 17.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn atr_wilder_step() {
        let candles = vec![
            candle(100.0, 102.0, 98.0, 101.0),
            candle(101.0, 104.0, 99.0, 103.0),
            candle(103.0, 106.0, 100.0, 105.0),
            candle(105.0, 108.0, 102.0, 107.0),
            candle(107.0, 117.0, 107.0, 110.0),
        ];
        let atr = calculate_atr(&candles, 3);
        // TR_4 = max(10, |117 - 107|, |107 - 107|) = 10
        let expected = (17.0 / 3.0 * 2.0 + 10.0) / 3.0;
        assert!((atr[4].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn atr_constant_range() {
        // All candles have the same range (H-L=10), close at midpoint.
        let candles: Vec<PriceBar> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                candle(base, base + 5.0, base - 5.0, base)
            })
            .collect();
        let atr = calculate_atr(&candles, 14);
        let last = atr[29].unwrap();
        assert!((last - 10.0).abs() < 1.0, "expected ATR near 10.0, got {last}");
    }

    #[test]
    fn atr_flat_market_is_zero() {
        let candles = vec![candle(100.0, 100.0, 100.0, 100.0); 20];
        let atr = calculate_atr(&candles, 14);
        for v in &atr[14..] {
            assert_eq!(*v, Some(0.0));
        }
    }

    #[test]
    fn atr_nan_ends_series() {
        let mut candles = vec![candle(100.0, 105.0, 95.0, 100.0); 6];
        candles[4].high = f64::NAN;
        let atr = calculate_atr(&candles, 3);
        assert!(atr[3].is_some());
        assert!(atr[4].is_none());
        assert!(atr[5].is_none());
    }

    #[test]
    fn atr_huge_period_is_all_none() {
        let candles = vec![candle(100.0, 105.0, 95.0, 100.0); 20];
        let atr = calculate_atr(&candles, usize::MAX);
        assert_eq!(atr.len(), 20);
        assert!(atr.iter().all(Option::is_none));
    }
}
