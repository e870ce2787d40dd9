//! Rolling-window technical indicator math
//!
//! Every function here is pure and works on the trailing end of a slice
//! ordered oldest → newest. A window is only valid once it is full
//! (min-periods = window size); before that the functions return `None`
//! and the caller decides the neutral value.
//!
//! ## Non-standard formulas (kept on purpose)
//! - RSI uses **simple** rolling means of gains and losses, not Wilder
//!   smoothing.
//! - Stochastic %K uses the rolling min/max of **closes**, not of highs/lows.
//!
//! Downstream thresholds are tuned against these exact definitions.

use crate::models::PriceBar;

/// Percentage change from `base` to `current`, 0.0 when `base` is zero
pub fn calculate_pct_change(current: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (current - base) / base * 100.0
    }
}

/// `numerator / denominator`, 0.0 when the denominator is zero
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Mean of the trailing `window` values
///
/// # Arguments
/// * `values` - Series ordered oldest first
/// * `window` - Number of trailing values (e.g., 5, 20)
///
/// # Returns
/// * `None` when fewer than `window` values exist or `window` is 0
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Sample standard deviation (n-1 denominator) of the trailing `window` values
pub fn trailing_sample_std(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
    Some(variance.sqrt())
}

/// Minimum and maximum of the trailing `window` values
pub fn trailing_min_max(values: &[f64], window: usize) -> Option<(f64, f64)> {
    if window == 0 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    let min = tail.iter().copied().fold(f64::INFINITY, f64::min);
    let max = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`
///
/// Seeded with the first value and no bias adjustment, so the output has
/// the same length as the input.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return ema;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    ema.push(first);
    for &value in &values[1..] {
        let prev = ema[ema.len() - 1];
        ema.push(alpha * value + (1.0 - alpha) * prev);
    }

    ema
}

/// MACD line (fast EMA − slow EMA) at the last value
pub fn calculate_macd(closes: &[f64], fast_span: usize, slow_span: usize) -> Option<f64> {
    let fast = calculate_ema(closes, fast_span);
    let slow = calculate_ema(closes, slow_span);
    let macd = fast.last()? - slow.last()?;

    macd.is_finite().then_some(macd)
}

/// RSI over the trailing `period` price changes using simple means
///
/// # Returns
/// * `None` when there are fewer than `period + 1` closes or the mean loss is
///   zero (RS undefined)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = trailing_mean(&gains, period)?;
    let avg_loss = trailing_mean(&losses, period)?;
    if avg_loss == 0.0 {
        return None;
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Position of the last close inside its Bollinger Bands, 0–100 inside the bands
///
/// Not clamped: a close outside the bands yields a value below 0 or above 100.
///
/// # Returns
/// * `None` when fewer than `window` closes exist or the bands have zero width
pub fn calculate_bb_position(closes: &[f64], window: usize, num_std: f64) -> Option<f64> {
    let middle = trailing_mean(closes, window)?;
    let std = trailing_sample_std(closes, window)?;
    let upper = middle + num_std * std;
    let lower = middle - num_std * std;
    let width = upper - lower;

    if width == 0.0 {
        return None;
    }

    let close = *closes.last()?;
    Some((close - lower) / width * 100.0)
}

/// Stochastic %K over the trailing `window` closes
pub fn calculate_stochastic_k(closes: &[f64], window: usize) -> Option<f64> {
    let (low, high) = trailing_min_max(closes, window)?;
    let range = high - low;

    if range == 0.0 {
        return None;
    }

    let close = *closes.last()?;
    Some((close - low) / range * 100.0)
}

/// Mean true range over the trailing `window` bars
pub fn calculate_atr(bars: &[PriceBar], window: usize) -> Option<f64> {
    let true_ranges: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let prev_close = i.checked_sub(1).map(|p| bars[p].close);
            bar.true_range(prev_close)
        })
        .collect();

    trailing_mean(&true_ranges, window)
}

/// ATR expressed as a percentage of the last close
pub fn calculate_atr_pct(bars: &[PriceBar], window: usize) -> Option<f64> {
    let atr = calculate_atr(bars, window)?;
    let close = bars.last()?.close;

    if close == 0.0 {
        return None;
    }

    Some(atr / close * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars_from(ohlc: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        ohlc.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| {
                PriceBar::new(start + chrono::Duration::days(i as i64), o, h, l, c, 1_000.0)
            })
            .collect()
    }

    #[test]
    fn test_trailing_mean() {
        let values = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        assert_eq!(trailing_mean(&values, 3), Some(14.0));
        assert_eq!(trailing_mean(&values, 6), Some(12.5));
        assert_eq!(trailing_mean(&values, 7), None); // Not enough data
        assert_eq!(trailing_mean(&values, 0), None);
    }

    #[test]
    fn test_trailing_sample_std() {
        // 2, 4, 4, 4, 5, 5, 7, 9: sample variance = 32 / 7
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = trailing_sample_std(&values, 8).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let ema = calculate_ema(&[10.0, 20.0], 3);
        // alpha = 0.5
        assert_eq!(ema, vec![10.0, 15.0]);
        assert!(calculate_ema(&[], 12).is_empty());
    }

    #[test]
    fn test_macd_flat_is_zero() {
        let closes = vec![50.0; 40];
        assert!(calculate_macd(&closes, 12, 26).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        assert!(calculate_macd(&closes, 12, 26).unwrap() > 0.0);
    }

    #[test]
    fn test_rsi_mixed_moves() {
        // Last 14 deltas: seven +2, seven -1 -> avg gain 1.0, avg loss 0.5, RS = 2
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!((rsi - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_undefined_without_losses() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&closes, 14), None);
        assert_eq!(calculate_rsi(&[1.0, 2.0], 14), None);
    }

    #[test]
    fn test_bb_position_flat_is_undefined() {
        let closes = vec![100.0; 20];
        assert_eq!(calculate_bb_position(&closes, 20, 2.0), None);
    }

    #[test]
    fn test_bb_position_rising_series() {
        // 1..=20: mean 10.5, sample variance 35
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let std = 35.0f64.sqrt();
        let expected = (20.0 - (10.5 - 2.0 * std)) / (4.0 * std) * 100.0;
        let pos = calculate_bb_position(&closes, 20, 2.0).unwrap();
        assert!((pos - expected).abs() < 1e-9);
    }

    #[test]
    fn test_stochastic_uses_closes() {
        let closes = vec![10.0, 20.0, 15.0];
        assert_eq!(calculate_stochastic_k(&closes, 3), Some(50.0));
        assert_eq!(calculate_stochastic_k(&[5.0, 5.0, 5.0], 3), None);
    }

    #[test]
    fn test_atr_pct() {
        // Every bar: range 2, no gaps -> ATR 2 on a close of 100
        let bars = bars_from(&vec![(100.0, 101.0, 99.0, 100.0); 14]);
        let atr_pct = calculate_atr_pct(&bars, 14).unwrap();
        assert!((atr_pct - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_pct_zero_close() {
        let bars = bars_from(&vec![(0.0, 0.0, 0.0, 0.0); 14]);
        assert_eq!(calculate_atr_pct(&bars, 14), None);
    }

    #[test]
    fn test_pct_change_and_ratio_guards() {
        assert!((calculate_pct_change(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert_eq!(calculate_pct_change(5.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }
}
