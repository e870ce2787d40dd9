//! Indicator Engine
//!
//! Turns one instrument's daily `PriceSeries` into an `IndicatorSnapshot`
//! as of its last bar. Pure computation: no I/O, no shared state, so callers
//! may run it over many instruments in parallel.
//!
//! Failure contract:
//! - Too little history → `AppError::InsufficientHistory`; the caller skips
//!   the instrument.
//! - A degenerate window inside one formula → that formula's neutral value.
//! - Any oscillator/volatility value still non-finite → the whole
//!   `TechnicalIndicators` set is replaced by `TechnicalIndicators::neutral()`
//!   and the snapshot is flagged `degraded`.

use tracing::{debug, warn};

use crate::constants::{
    ATR_WINDOW, BOLLINGER_STD_MULTIPLIER, MACD_FAST_SPAN, MACD_SLOW_SPAN, MONTH_LOOKBACK_BARS,
    RSI_WINDOW, SHORT_VOLUME_WINDOW, SMA_WINDOW, STOCHASTIC_WINDOW, neutral,
};
use crate::error::{AppError, Result};
use crate::models::indicators::{
    calculate_atr_pct, calculate_bb_position, calculate_macd, calculate_pct_change, calculate_rsi,
    calculate_stochastic_k, safe_ratio, trailing_mean,
};
use crate::models::{
    DaySignal, HistoryMode, IndicatorSnapshot, MoneyFlowMode, PriceSeries, TechnicalIndicators,
};

/// Engine settings shared by every instrument in a batch
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    pub money_flow_mode: MoneyFlowMode,
}

impl IndicatorEngine {
    pub fn new(money_flow_mode: MoneyFlowMode) -> Self {
        Self { money_flow_mode }
    }

    /// Compute the snapshot for the last bar of `series`
    pub fn compute(&self, series: &PriceSeries, mode: HistoryMode) -> Result<IndicatorSnapshot> {
        let bars = series.bars();
        let n = bars.len();
        let required = mode.min_bars();

        if n < required {
            return Err(AppError::InsufficientHistory {
                ticker: series.ticker().to_string(),
                bars: n,
                required,
            });
        }

        let closes = series.closes();
        let volumes = series.volumes();
        let current = &bars[n - 1];
        let close = current.close;
        let volume = current.volume;

        let day_change_pct = calculate_pct_change(close, closes[n - 2]);

        let sma20 = trailing_mean(&closes, SMA_WINDOW);
        let vol_avg20 = trailing_mean(&volumes, SMA_WINDOW);
        let vol_avg5 = trailing_mean(&volumes, SHORT_VOLUME_WINDOW);

        let vol_vs_avg_pct = vol_avg20.map_or(0.0, |avg| safe_ratio(volume, avg) * 100.0);

        let pct_1month = n
            .checked_sub(MONTH_LOOKBACK_BARS)
            .map_or(0.0, |i| calculate_pct_change(close, closes[i]));

        let money_flow_strength = match self.money_flow_mode {
            MoneyFlowMode::VolumeRatio => match (vol_avg5, vol_avg20) {
                (Some(short), Some(long)) => safe_ratio(short, long),
                _ => 0.0,
            },
            MoneyFlowMode::PriceWeighted => {
                (vol_vs_avg_pct / 100.0) * (1.0 + day_change_pct.abs() / 100.0)
            }
        };

        let avg_trading_value = vol_avg20.unwrap_or(0.0) * close;

        for (field, value) in [
            ("price", close),
            ("day_change_pct", day_change_pct),
            ("vol_vs_avg_pct", vol_vs_avg_pct),
            ("pct_1month", pct_1month),
            ("money_flow_strength", money_flow_strength),
            ("avg_trading_value", avg_trading_value),
        ] {
            if !value.is_finite() {
                return Err(AppError::Numeric(format!(
                    "{}: {} is not finite",
                    series.ticker(),
                    field
                )));
            }
        }

        let (indicators, degraded) = match compute_technical(series) {
            Ok(indicators) => (indicators, false),
            Err(e) => {
                warn!(ticker = %series.ticker(), error = %e, "Falling back to neutral indicators");
                (TechnicalIndicators::neutral(), true)
            }
        };

        let signal = DaySignal::classify(close, sma20, volume, vol_avg20);

        debug!(
            ticker = %series.ticker(),
            bars = n,
            signal = %signal,
            money_flow = money_flow_strength,
            "Computed snapshot"
        );

        Ok(IndicatorSnapshot {
            ticker: series.ticker().to_string(),
            as_of: current.date,
            price: close,
            day_change_pct,
            vol_vs_avg_pct,
            pct_1month,
            money_flow_strength,
            avg_trading_value,
            indicators,
            signal,
            degraded,
        })
    }
}

/// Compute a snapshot with the default money-flow formula
pub fn compute_snapshot(series: &PriceSeries, mode: HistoryMode) -> Result<IndicatorSnapshot> {
    IndicatorEngine::default().compute(series, mode)
}

/// RSI, MACD, Bollinger position, Stochastic, ATR% and volume trend
///
/// Each formula falls back to its own neutral value on a degenerate window.
/// Returns `AppError::Numeric` when a value is still non-finite afterwards.
pub fn compute_technical(series: &PriceSeries) -> Result<TechnicalIndicators> {
    let closes = series.closes();
    let volumes = series.volumes();

    let vol_trend = match (volumes.last(), trailing_mean(&volumes, SMA_WINDOW)) {
        (Some(&volume), Some(avg)) if avg != 0.0 => (volume / avg - 1.0) * 100.0,
        _ => neutral::VOL_TREND,
    };

    let indicators = TechnicalIndicators {
        rsi: calculate_rsi(&closes, RSI_WINDOW).unwrap_or(neutral::RSI),
        macd: calculate_macd(&closes, MACD_FAST_SPAN, MACD_SLOW_SPAN).unwrap_or(neutral::MACD),
        bb_position: calculate_bb_position(&closes, SMA_WINDOW, BOLLINGER_STD_MULTIPLIER)
            .unwrap_or(neutral::BB_POSITION),
        stochastic: calculate_stochastic_k(&closes, STOCHASTIC_WINDOW)
            .unwrap_or(neutral::STOCHASTIC),
        atr_pct: calculate_atr_pct(series.bars(), ATR_WINDOW).unwrap_or(neutral::ATR_PCT),
        vol_trend,
    };

    match indicators.first_non_finite() {
        Some(field) => Err(AppError::Numeric(format!(
            "{}: {} is not finite",
            series.ticker(),
            field
        ))),
        None => Ok(indicators),
    }
}
