//! Daily bar loader
//!
//! Reads `<data_dir>/<TICKER>/daily.csv` files into `PriceSeries`. Rows are
//! sorted by date; duplicate dates keep the last row. Extra trailing columns
//! (enhanced CSVs) are ignored.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{csv_column, CSV_BASIC_COLUMNS, DAILY_FILENAME};
use crate::error::{AppError, Result};
use crate::models::{PriceBar, PriceSeries};
use crate::utils::display_code;

/// Locate the daily CSV for a ticker
///
/// Tries the full data-source ticker first (`2330.TW`), then the display
/// code (`2330`).
pub fn daily_csv_path(data_dir: &Path, ticker: &str) -> Option<PathBuf> {
    let full = data_dir.join(ticker).join(DAILY_FILENAME);
    if full.exists() {
        return Some(full);
    }

    let code = display_code(ticker);
    if code != ticker {
        let short = data_dir.join(code).join(DAILY_FILENAME);
        if short.exists() {
            return Some(short);
        }
    }

    None
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`, keeping the calendar date
pub fn parse_bar_date(time_str: &str) -> Result<NaiveDate> {
    let trimmed = time_str.trim();
    if trimmed.contains(' ') {
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.date())
            .map_err(|e| AppError::Parse(format!("Invalid datetime '{}': {}", trimmed, e)))
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|e| AppError::Parse(format!("Invalid date '{}': {}", trimmed, e)))
    }
}

fn parse_field(record: &StringRecord, index: usize, name: &str, path: &Path) -> Result<f64> {
    let raw = record
        .get(index)
        .ok_or_else(|| AppError::Parse(format!("Missing {} in {}", name, path.display())))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::Parse(format!("Invalid {} '{}' in {}: {}", name, raw, path.display(), e)))?;

    if !value.is_finite() {
        return Err(AppError::Parse(format!(
            "Non-finite {} in {}",
            name,
            path.display()
        )));
    }
    Ok(value)
}

fn parse_record(record: &StringRecord, path: &Path) -> Result<PriceBar> {
    if record.len() < CSV_BASIC_COLUMNS {
        return Err(AppError::Parse(format!(
            "Invalid CSV format in {}: expected at least {} fields, got {}",
            path.display(),
            CSV_BASIC_COLUMNS,
            record.len()
        )));
    }

    let time_str = record
        .get(csv_column::TIME)
        .ok_or_else(|| AppError::Parse(format!("Missing time in {}", path.display())))?;

    Ok(PriceBar::new(
        parse_bar_date(time_str)?,
        parse_field(record, csv_column::OPEN, "open", path)?,
        parse_field(record, csv_column::HIGH, "high", path)?,
        parse_field(record, csv_column::LOW, "low", path)?,
        parse_field(record, csv_column::CLOSE, "close", path)?,
        parse_field(record, csv_column::VOLUME, "volume", path)?,
    ))
}

/// Read every bar in a daily CSV file, sorted and de-duplicated
pub fn read_daily_csv(ticker: &str, path: &Path) -> Result<PriceSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut bars = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| AppError::Parse(format!("CSV parse error in {}: {}", path.display(), e)))?;
        bars.push(parse_record(&record, path)?);
    }

    // Stable sort, so among equal dates the later row stays last
    bars.sort_by_key(|b| b.date);

    let before = bars.len();
    let mut deduped: Vec<PriceBar> = Vec::with_capacity(before);
    for bar in bars {
        match deduped.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => deduped.push(bar),
        }
    }

    if deduped.len() < before {
        warn!(
            ticker = %ticker,
            removed = before - deduped.len(),
            "Duplicate dates in daily CSV, kept last row"
        );
    }

    PriceSeries::new(ticker, deduped)
}

/// Load one ticker limited to the trailing window `(start, end]`
pub fn load_series(data_dir: &Path, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
    let path = daily_csv_path(data_dir, ticker).ok_or_else(|| {
        AppError::NotFound(format!(
            "No {} for {} under {}",
            DAILY_FILENAME,
            ticker,
            data_dir.display()
        ))
    })?;

    let series = read_daily_csv(ticker, &path)?.trailing_window(start, end);
    debug!(ticker = %ticker, bars = series.len(), "Loaded daily bars");
    Ok(series)
}

/// Ticker directories present under a data directory, sorted
pub fn list_ticker_dirs(data_dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", data_dir.display(), e)))?;

    let mut tickers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            tickers.push(name.to_string());
        }
    }

    tickers.sort();
    Ok(tickers)
}
