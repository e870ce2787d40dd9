use chrono::NaiveDate;
use std::path::Path;

use crate::error::Result;
use crate::models::Universe;
use crate::services::bar_loader::{daily_csv_path, list_ticker_dirs, read_daily_csv};

/// Data-directory statistics for one market
#[derive(Debug, Clone)]
pub struct MarketStats {
    /// Ticker directories found on disk
    pub total_tickers: usize,
    pub has_data: bool,
    /// Universe instruments with no daily CSV
    pub missing: Vec<String>,
    /// Most recent bar date across the universe
    pub latest_date: Option<NaiveDate>,
    /// Universe instruments whose last bar is older than `latest_date`
    pub stale: Vec<String>,
}

/// Daily CSV summary for one ticker
#[derive(Debug, Clone)]
pub struct TickerInfo {
    pub ticker: String,
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub last_close: Option<f64>,
}

/// Read the full daily CSV of a ticker
pub fn get_ticker_info(data_dir: &Path, ticker: &str) -> Result<Option<TickerInfo>> {
    let Some(path) = daily_csv_path(data_dir, ticker) else {
        return Ok(None);
    };

    let series = read_daily_csv(ticker, &path)?;
    Ok(Some(TickerInfo {
        ticker: ticker.to_string(),
        record_count: series.len(),
        first_date: series.bars().first().map(|b| b.date),
        last_date: series.as_of(),
        last_close: series.last().map(|b| b.close),
    }))
}

/// Compare a market's data directory against its universe
///
/// Unreadable CSVs are counted as missing.
pub fn get_market_stats(data_dir: &Path, universe: &Universe) -> Result<MarketStats> {
    if !data_dir.exists() {
        return Ok(MarketStats {
            total_tickers: 0,
            has_data: false,
            missing: universe.tickers(),
            latest_date: None,
            stale: Vec::new(),
        });
    }

    let total_tickers = list_ticker_dirs(data_dir)?.len();

    let mut missing = Vec::new();
    let mut last_dates = Vec::new();
    for ticker in universe.tickers() {
        match get_ticker_info(data_dir, &ticker) {
            Ok(Some(TickerInfo { last_date: Some(last), .. })) => last_dates.push((ticker, last)),
            _ => missing.push(ticker),
        }
    }

    let latest_date = last_dates.iter().map(|(_, d)| *d).max();
    let stale = match latest_date {
        Some(latest) => last_dates
            .into_iter()
            .filter(|(_, d)| *d < latest)
            .map(|(t, _)| t)
            .collect(),
        None => Vec::new(),
    };

    Ok(MarketStats {
        total_tickers,
        has_data: total_tickers > 0,
        missing,
        latest_date,
        stale,
    })
}
