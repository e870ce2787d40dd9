use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PriceBar;

/// Ordered daily bars for a single instrument
///
/// Dates are strictly increasing. Missing trading days are simply absent,
/// nothing is interpolated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate dates
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self> {
        let ticker = ticker.into();

        if let Some(pos) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(AppError::InvalidInput(format!(
                "{}: dates not strictly increasing at {} -> {}",
                ticker,
                bars[pos].date,
                bars[pos + 1].date
            )));
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Date of the most recent bar
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Keep only bars with `start < date <= end`
    pub fn trailing_window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date > start && b.date <= end)
            .copied()
            .collect();

        Self {
            ticker: self.ticker.clone(),
            bars,
        }
    }
}
