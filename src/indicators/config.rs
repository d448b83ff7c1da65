// =============================================================================
// Indicator Configuration — which windows to compute
// =============================================================================
//
// Every field carries a serde default so a partial JSON object (or `{}`)
// yields the standard daily-chart set:
//
//   MA 5/10/20/60, RSI 6/12, MACD 12/26/9, Bollinger 20/2,
//   Stochastic 9/3/3, ATR 14, Volume MA 5/10
//
// Optional families are switched off with `null`; window lists with `[]`.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest window accepted from a config, in bars (about four trading years).
pub const MAX_WINDOW: usize = 1_000;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_ma_windows() -> Vec<usize> {
    vec![5, 10, 20, 60]
}

fn default_rsi_windows() -> Vec<usize> {
    vec![6, 12]
}

fn default_macd() -> Option<MacdParams> {
    Some(MacdParams::default())
}

fn default_bollinger() -> Option<BollingerParams> {
    Some(BollingerParams::default())
}

fn default_stochastic() -> Option<StochasticParams> {
    Some(StochasticParams::default())
}

fn default_atr_window() -> Option<usize> {
    Some(14)
}

fn default_volume_ma_windows() -> Vec<usize> {
    vec![5, 10]
}

// =============================================================================
// Per-family parameters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub window: usize,
    /// Band width in standard deviations.
    pub k: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self { window: 20, k: 2.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StochasticParams {
    pub fastk: usize,
    pub smooth_k: usize,
    pub smooth_d: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            fastk: 9,
            smooth_k: 3,
            smooth_d: 3,
        }
    }
}

// =============================================================================
// IndicatorConfig
// =============================================================================

/// The set of indicators one `compute_indicators` call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Close-price SMA windows, emitted as `ma{w}`.
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,

    /// RSI windows, emitted as `rsi{w}`.
    #[serde(default = "default_rsi_windows")]
    pub rsi_windows: Vec<usize>,

    /// Emitted as `macd`, `macd_signal`, `macd_hist`.
    #[serde(default = "default_macd")]
    pub macd: Option<MacdParams>,

    /// Emitted as `boll_upper`, `boll_middle`, `boll_lower`.
    #[serde(default = "default_bollinger")]
    pub bollinger: Option<BollingerParams>,

    /// Emitted as `kd_k`, `kd_d`.
    #[serde(default = "default_stochastic")]
    pub stochastic: Option<StochasticParams>,

    /// Emitted as `atr{w}`.
    #[serde(default = "default_atr_window")]
    pub atr_window: Option<usize>,

    /// Volume SMA windows, emitted as `volume_ma{w}`.
    #[serde(default = "default_volume_ma_windows")]
    pub volume_ma_windows: Vec<usize>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_windows: default_ma_windows(),
            rsi_windows: default_rsi_windows(),
            macd: default_macd(),
            bollinger: default_bollinger(),
            stochastic: default_stochastic(),
            atr_window: default_atr_window(),
            volume_ma_windows: default_volume_ma_windows(),
        }
    }
}

impl IndicatorConfig {
    /// Reject windows the engine cannot compute: zero, longer than
    /// [`MAX_WINDOW`], or listed twice within one family.
    pub fn validate(&self) -> Result<()> {
        check_windows("ma", &self.ma_windows)?;
        check_windows("rsi", &self.rsi_windows)?;
        check_windows("volume_ma", &self.volume_ma_windows)?;

        if let Some(m) = self.macd {
            check_window("macd fast", m.fast)?;
            check_window("macd slow", m.slow)?;
            check_window("macd signal", m.signal)?;
            if m.fast >= m.slow {
                return Err(Error::InvalidConfig(format!(
                    "macd fast period ({}) must be shorter than slow period ({})",
                    m.fast, m.slow
                )));
            }
        }
        if let Some(b) = self.bollinger {
            check_window("bollinger", b.window)?;
            if !(b.k.is_finite() && b.k > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "bollinger k must be positive, got {}",
                    b.k
                )));
            }
        }
        if let Some(s) = self.stochastic {
            check_window("stochastic fastk", s.fastk)?;
            check_window("stochastic smooth_k", s.smooth_k)?;
            check_window("stochastic smooth_d", s.smooth_d)?;
        }
        if let Some(w) = self.atr_window {
            check_window("atr", w)?;
        }
        Ok(())
    }

    /// Minimum series length: the longest requested window, counted as the
    /// bars needed for the first defined value of each indicator's main line
    /// (the MACD line, not its signal; %K, not %D).
    ///
    /// Returns 1 when nothing is requested (a series still needs one bar).
    pub fn required_bars(&self) -> usize {
        let mut required = 1;

        for &w in self.ma_windows.iter().chain(&self.volume_ma_windows) {
            required = required.max(w);
        }
        for &w in &self.rsi_windows {
            required = required.max(w.saturating_add(1));
        }
        if let Some(m) = self.macd {
            required = required.max(m.slow);
        }
        if let Some(b) = self.bollinger {
            required = required.max(b.window);
        }
        if let Some(s) = self.stochastic {
            required = required.max(s.fastk.saturating_add(s.smooth_k).saturating_sub(1));
        }
        if let Some(w) = self.atr_window {
            required = required.max(w.saturating_add(1));
        }

        required
    }
}

fn check_window(name: &str, w: usize) -> Result<()> {
    if w == 0 {
        return Err(Error::InvalidConfig(format!("{name} window must be non-zero")));
    }
    if w > MAX_WINDOW {
        return Err(Error::InvalidConfig(format!(
            "{name} window {w} exceeds the maximum of {MAX_WINDOW}"
        )));
    }
    Ok(())
}

fn check_windows(name: &str, windows: &[usize]) -> Result<()> {
    for (i, &w) in windows.iter().enumerate() {
        check_window(name, w)?;
        if windows[..i].contains(&w) {
            return Err(Error::InvalidConfig(format!("{name} window {w} listed twice")));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_requires_sixty_bars() {
        let cfg = IndicatorConfig::default();
        assert_eq!(cfg.required_bars(), 60);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: IndicatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, IndicatorConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "ma_windows": [5, 20], "macd": null }"#;
        let cfg: IndicatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.ma_windows, vec![5, 20]);
        assert!(cfg.macd.is_none());
        assert_eq!(cfg.rsi_windows, vec![6, 12]);
        assert_eq!(cfg.atr_window, Some(14));
    }

    #[test]
    fn required_bars_follows_longest_request() {
        let cfg = IndicatorConfig {
            ma_windows: vec![5],
            rsi_windows: vec![],
            macd: Some(MacdParams::default()),
            bollinger: None,
            stochastic: None,
            atr_window: None,
            volume_ma_windows: vec![],
        };
        assert_eq!(cfg.required_bars(), 26);

        let cfg = IndicatorConfig {
            macd: None,
            atr_window: Some(14),
            ..cfg
        };
        assert_eq!(cfg.required_bars(), 15);
    }

    #[test]
    fn zero_window_is_invalid() {
        let cfg = IndicatorConfig {
            ma_windows: vec![5, 0],
            ..IndicatorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let cfg = IndicatorConfig {
            atr_window: Some(0),
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_macd_is_invalid() {
        let cfg = IndicatorConfig {
            macd: Some(MacdParams {
                fast: 26,
                slow: 12,
                signal: 9,
            }),
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_bollinger_k_is_invalid() {
        let cfg = IndicatorConfig {
            bollinger: Some(BollingerParams { window: 20, k: 0.0 }),
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn oversized_windows_are_invalid() {
        let json_cases = [
            r#"{ "rsi_windows": [18446744073709551615] }"#,
            r#"{ "atr_window": 18446744073709551615 }"#,
            r#"{ "stochastic": { "fastk": 18446744073709551615, "smooth_k": 3, "smooth_d": 3 } }"#,
            r#"{ "ma_windows": [1001] }"#,
        ];
        for json in json_cases {
            let cfg: IndicatorConfig = serde_json::from_str(json).unwrap();
            assert!(
                matches!(cfg.validate(), Err(Error::InvalidConfig(_))),
                "accepted {json}"
            );
        }

        let cfg = IndicatorConfig {
            ma_windows: vec![MAX_WINDOW],
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn required_bars_saturates_instead_of_overflowing() {
        let cfg = IndicatorConfig {
            rsi_windows: vec![usize::MAX],
            atr_window: Some(usize::MAX),
            stochastic: Some(StochasticParams {
                fastk: usize::MAX,
                smooth_k: 3,
                smooth_d: 3,
            }),
            ..IndicatorConfig::default()
        };
        assert_eq!(cfg.required_bars(), usize::MAX);
    }

    #[test]
    fn duplicate_windows_are_invalid() {
        let cfg = IndicatorConfig {
            ma_windows: vec![5, 10, 5],
            ..IndicatorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        // Same window in different families is fine.
        let cfg = IndicatorConfig {
            ma_windows: vec![5],
            volume_ma_windows: vec![5],
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
