use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::neutral;

/// How much history an instrument must have before it gets a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Full 22-bar requirement
    Standard,
    /// Best-effort 10-bar requirement for favourites
    Relaxed,
}

impl HistoryMode {
    pub fn min_bars(&self) -> usize {
        match self {
            HistoryMode::Standard => crate::constants::MIN_BARS_STANDARD,
            HistoryMode::Relaxed => crate::constants::MIN_BARS_RELAXED,
        }
    }
}

/// Formula behind the money-flow strength column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoneyFlowMode {
    /// `vol_avg5 / vol_avg20`
    #[default]
    VolumeRatio,
    /// `(vol_vs_avg / 100) * (1 + |day_change| / 100)`
    PriceWeighted,
}

impl MoneyFlowMode {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "volume_ratio" | "ratio" => Ok(MoneyFlowMode::VolumeRatio),
            "price_weighted" | "weighted" => Ok(MoneyFlowMode::PriceWeighted),
            _ => Err(format!(
                "Invalid money flow mode: '{}'. Valid values: volume_ratio, price_weighted",
                s
            )),
        }
    }
}

/// Categorical read of the current bar against its 20-day averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaySignal {
    Breakout,
    Accumulation,
    Weak,
}

impl DaySignal {
    /// First match wins: Breakout, then Accumulation, otherwise Weak
    ///
    /// The comparisons are strict, so a close equal to its SMA20 is Weak.
    /// Undefined averages (fewer than 20 bars) also give Weak.
    pub fn classify(close: f64, sma20: Option<f64>, volume: f64, vol_avg20: Option<f64>) -> Self {
        let Some(sma20) = sma20 else {
            return DaySignal::Weak;
        };

        if close > sma20 {
            match vol_avg20 {
                Some(avg) if volume > avg => DaySignal::Breakout,
                _ => DaySignal::Accumulation,
            }
        } else {
            DaySignal::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DaySignal::Breakout => "Breakout",
            DaySignal::Accumulation => "Accumulation",
            DaySignal::Weak => "Weak",
        }
    }
}

impl fmt::Display for DaySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Oscillator and volatility readings at the last bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    /// RSI(14), simple-mean variant
    pub rsi: f64,
    /// EMA12 − EMA26
    pub macd: f64,
    /// Close position inside the 20-bar Bollinger Bands (not clamped)
    pub bb_position: f64,
    /// %K(14) over closes
    pub stochastic: f64,
    /// ATR(14) as a percent of close
    pub atr_pct: f64,
    /// Current volume vs 20-bar average, in percent above/below
    pub vol_trend: f64,
}

impl TechnicalIndicators {
    /// Values used when indicators cannot be computed
    pub fn neutral() -> Self {
        Self {
            rsi: neutral::RSI,
            macd: neutral::MACD,
            bb_position: neutral::BB_POSITION,
            stochastic: neutral::STOCHASTIC,
            atr_pct: neutral::ATR_PCT,
            vol_trend: neutral::VOL_TREND,
        }
    }

    /// Name of the first non-finite field, if any
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("bb_position", self.bb_position),
            ("stochastic", self.stochastic),
            ("atr_pct", self.atr_pct),
            ("vol_trend", self.vol_trend),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

impl Default for TechnicalIndicators {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Point-in-time metrics for one instrument, as of its last bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ticker: String,

    /// Date of the last bar
    pub as_of: NaiveDate,

    /// Last close
    pub price: f64,

    /// Close vs previous close, percent
    pub day_change_pct: f64,

    /// Current volume vs 20-bar average volume, percent (100 = average)
    pub vol_vs_avg_pct: f64,

    /// Close vs the close 21 bars back, percent
    pub pct_1month: f64,

    /// Short vs long volume average ratio (≈1.0 under steady volume)
    pub money_flow_strength: f64,

    /// 20-bar average volume × last close, in local currency
    pub avg_trading_value: f64,

    pub indicators: TechnicalIndicators,

    pub signal: DaySignal,

    /// Indicators fell back to neutral values
    #[serde(default)]
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_breakout() {
        let signal = DaySignal::classify(110.0, Some(100.0), 200.0, Some(150.0));
        assert_eq!(signal, DaySignal::Breakout);
    }

    #[test]
    fn test_signal_accumulation() {
        let signal = DaySignal::classify(110.0, Some(100.0), 100.0, Some(150.0));
        assert_eq!(signal, DaySignal::Accumulation);
    }

    #[test]
    fn test_signal_weak_any_volume() {
        assert_eq!(DaySignal::classify(90.0, Some(100.0), 1e9, Some(150.0)), DaySignal::Weak);
        assert_eq!(DaySignal::classify(90.0, Some(100.0), 0.0, Some(150.0)), DaySignal::Weak);
    }

    #[test]
    fn test_signal_flat_price_is_weak() {
        assert_eq!(DaySignal::classify(100.0, Some(100.0), 500.0, Some(100.0)), DaySignal::Weak);
    }

    #[test]
    fn test_signal_without_sma_is_weak() {
        assert_eq!(DaySignal::classify(100.0, None, 500.0, None), DaySignal::Weak);
    }

    #[test]
    fn test_neutral_indicators() {
        let n = TechnicalIndicators::neutral();
        assert_eq!(n.rsi, 50.0);
        assert_eq!(n.macd, 0.0);
        assert_eq!(n.bb_position, 50.0);
        assert_eq!(n.stochastic, 50.0);
        assert_eq!(n.atr_pct, 0.0);
        assert_eq!(n.vol_trend, 0.0);
        assert_eq!(n.first_non_finite(), None);
    }

    #[test]
    fn test_first_non_finite() {
        let mut ind = TechnicalIndicators::neutral();
        ind.stochastic = f64::NAN;
        ind.atr_pct = f64::INFINITY;
        assert_eq!(ind.first_non_finite(), Some("stochastic"));
    }

    #[test]
    fn test_money_flow_mode_from_str() {
        assert_eq!(MoneyFlowMode::from_str("volume_ratio").unwrap(), MoneyFlowMode::VolumeRatio);
        assert_eq!(MoneyFlowMode::from_str("Price-Weighted").unwrap(), MoneyFlowMode::PriceWeighted);
        assert!(MoneyFlowMode::from_str("obv").is_err());
    }

    #[test]
    fn test_signal_serialize() {
        let json = serde_json::to_string(&DaySignal::Accumulation).unwrap();
        assert_eq!(json, r#""Accumulation""#);
    }
}
