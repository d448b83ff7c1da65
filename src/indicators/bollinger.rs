// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same window of closes.
//
// Zero variance collapses all three bands onto the mean; that is a valid
// output, not an undefined one.
// =============================================================================

use super::IndicatorValue;

/// Upper, middle and lower bands aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<IndicatorValue>,
    pub middle: Vec<IndicatorValue>,
    pub lower: Vec<IndicatorValue>,
}

/// Calculate Bollinger Bands for every index of `closes`.
///
/// - `middle` = SMA(`period`)
/// - `upper`  = middle + `num_std` * σ
/// - `lower`  = middle - `num_std` * σ
///
/// All three are `None` for `i < period - 1` and wherever the window holds a
/// non-finite value.
///
/// # Panics
/// When `period == 0`.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    assert!(period > 0, "Bollinger period must be non-zero");

    let n = closes.len();
    let mut out = BollingerSeries {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if n < period {
        return out;
    }

    let period_f = period as f64;
    for i in (period - 1)..n {
        let window = &closes[i + 1 - period..=i];
        let middle = window.iter().sum::<f64>() / period_f;
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
        let band = num_std * variance.sqrt();

        if !middle.is_finite() || !band.is_finite() {
            continue;
        }

        out.upper[i] = Some(middle + band);
        out.middle[i] = Some(middle);
        out.lower[i] = Some(middle - band);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        let (upper, middle, lower) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!(upper > middle);
        assert!(lower < middle);
        assert!((middle - 10.5).abs() < 1e-10);
        // population σ of 1..=20 = sqrt((20^2 - 1) / 12)
        let sigma = ((400.0_f64 - 1.0) / 12.0).sqrt();
        assert!((upper - (10.5 + 2.0 * sigma)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_warm_up() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        assert!(bb.middle[..19].iter().all(Option::is_none));
        assert!(bb.upper[..19].iter().all(Option::is_none));
        assert!(bb.middle[19..].iter().all(Option::is_some));
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bb.middle.iter().all(Option::is_none));
        assert_eq!(bb.middle.len(), 3);
    }

    #[test]
    fn bollinger_flat_collapses_bands() {
        let bb = calculate_bollinger(&vec![100.0; 20], 20, 2.0);
        assert_eq!(bb.upper[19], Some(100.0));
        assert_eq!(bb.middle[19], Some(100.0));
        assert_eq!(bb.lower[19], Some(100.0));
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 50.0 + (i as f64 * 0.7).cos() * 3.0 + i as f64 * 0.1)
            .collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        for i in 19..closes.len() {
            let (u, m, l) = (bb.upper[i].unwrap(), bb.middle[i].unwrap(), bb.lower[i].unwrap());
            assert!(((u - m) - (m - l)).abs() < 1e-9, "asymmetric bands at {i}");
        }
    }
}
