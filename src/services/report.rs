//! Report writer and reader
//!
//! One CSV per table plus `snapshots.json` holding the unrounded rows.
//! Rounding is applied here only, never in the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{report_file, TRADING_VALUE_DIVISOR};
use crate::error::{AppError, Result};
use crate::models::{Market, SectorAggregate, SnapshotRow};
use crate::utils::round_to;

/// Full scan output, serialized to `snapshots.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub market: Market,
    pub as_of: NaiveDate,
    /// Sorted by display code
    pub rows: Vec<SnapshotRow>,
    /// Sorted by mean 1-month change, descending
    pub sectors: Vec<SectorAggregate>,
    /// Tickers in the universe that produced no row
    #[serde(default)]
    pub skipped: Vec<String>,
}

impl ScanReport {
    pub fn favorites(&self) -> impl Iterator<Item = &SnapshotRow> {
        self.rows.iter().filter(|r| r.favorite)
    }
}

#[derive(Serialize)]
struct DailySignalRecord<'a> {
    code: &'a str,
    name: &'a str,
    price: f64,
    day_change_pct: f64,
    vol_vs_avg_pct: f64,
    signal: &'a str,
}

#[derive(Serialize)]
struct TrendRecord<'a> {
    code: &'a str,
    name: &'a str,
    sector: &'a str,
    exchange: &'a str,
    pct_1month: f64,
    money_flow_strength: f64,
    avg_trading_value_bn: f64,
}

#[derive(Serialize)]
struct SectorRecord<'a> {
    sector: &'a str,
    mean_pct_1month: f64,
    mean_money_flow: f64,
    total_trading_value_bn: f64,
    count: usize,
}

#[derive(Serialize)]
struct FavoriteRecord<'a> {
    code: &'a str,
    name: &'a str,
    sector: &'a str,
    price: f64,
    day_change_pct: f64,
    pct_1month: f64,
    rsi: f64,
    macd: f64,
    bb_position: f64,
    stochastic: f64,
    atr_pct: f64,
    vol_trend: f64,
    money_flow_strength: f64,
    quick_action: &'a str,
}

fn billions(value: f64) -> f64 {
    round_to(value / TRADING_VALUE_DIVISOR, 3)
}

fn write_table<T: Serialize>(path: &Path, records: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every table into `report_dir`, returning the files written
pub fn write_report(report: &ScanReport, report_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(report_dir)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", report_dir.display(), e)))?;

    let mut written = Vec::new();

    let path = report_dir.join(report_file::DAILY_SIGNALS);
    write_table(
        &path,
        report.rows.iter().map(|r| DailySignalRecord {
            code: &r.code,
            name: &r.name,
            price: round_to(r.snapshot.price, 2),
            day_change_pct: round_to(r.snapshot.day_change_pct, 2),
            vol_vs_avg_pct: round_to(r.snapshot.vol_vs_avg_pct, 0),
            signal: r.snapshot.signal.as_str(),
        }),
    )?;
    written.push(path);

    let path = report_dir.join(report_file::TREND);
    write_table(
        &path,
        report.rows.iter().map(|r| TrendRecord {
            code: &r.code,
            name: &r.name,
            sector: &r.sector,
            exchange: r.exchange.as_deref().unwrap_or(""),
            pct_1month: round_to(r.snapshot.pct_1month, 2),
            money_flow_strength: round_to(r.snapshot.money_flow_strength, 2),
            avg_trading_value_bn: billions(r.snapshot.avg_trading_value),
        }),
    )?;
    written.push(path);

    let path = report_dir.join(report_file::SECTOR_FLOW);
    write_table(
        &path,
        report.sectors.iter().map(|s| SectorRecord {
            sector: &s.sector,
            mean_pct_1month: round_to(s.mean_pct_1month, 2),
            mean_money_flow: round_to(s.mean_money_flow, 2),
            total_trading_value_bn: billions(s.total_trading_value),
            count: s.count,
        }),
    )?;
    written.push(path);

    // Stale favourites from an earlier run would be misleading
    let path = report_dir.join(report_file::FAVORITES);
    if report.favorites().next().is_some() {
        write_table(
            &path,
            report.favorites().map(|r| {
                let ind = &r.snapshot.indicators;
                FavoriteRecord {
                    code: &r.code,
                    name: &r.name,
                    sector: &r.sector,
                    price: round_to(r.snapshot.price, 2),
                    day_change_pct: round_to(r.snapshot.day_change_pct, 2),
                    pct_1month: round_to(r.snapshot.pct_1month, 2),
                    rsi: round_to(ind.rsi, 2),
                    macd: round_to(ind.macd, 2),
                    bb_position: round_to(ind.bb_position, 2),
                    stochastic: round_to(ind.stochastic, 2),
                    atr_pct: round_to(ind.atr_pct, 2),
                    vol_trend: round_to(ind.vol_trend, 2),
                    money_flow_strength: round_to(r.snapshot.money_flow_strength, 2),
                    quick_action: r.action().as_str(),
                }
            }),
        )?;
        written.push(path);
    } else if path.exists() {
        fs::remove_file(&path)?;
    }

    let path = report_dir.join(report_file::SNAPSHOTS);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    written.push(path);

    info!(
        dir = %report_dir.display(),
        rows = report.rows.len(),
        sectors = report.sectors.len(),
        "Report written"
    );

    Ok(written)
}

/// Read `snapshots.json` back from a report directory
pub fn load_report(report_dir: &Path) -> Result<ScanReport> {
    let path = report_dir.join(report_file::SNAPSHOTS);
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "{} (run `scan` first)",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    let report: ScanReport = serde_json::from_str(&content)?;
    Ok(report)
}
