use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one instrument
///
/// Dates are exchange-local calendar days. Volume is integer-valued in
/// practice but kept as `f64` so every formula works in one numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day (exchange-local)
    pub date: NaiveDate,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume (shares)
    pub volume: f64,
}

impl PriceBar {
    /// Create a new daily bar
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar where open, high, low and close are all the same price
    pub fn flat(date: NaiveDate, price: f64, volume: f64) -> Self {
        Self::new(date, price, price, price, price, volume)
    }

    /// True range against the previous close (plain high-low when there is none)
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let range = self.high - self.low;
        match prev_close {
            Some(prev) => range
                .max((self.high - prev).abs())
                .max((self.low - prev).abs()),
            None => range,
        }
    }
}
