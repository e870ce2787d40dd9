use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::models::{HistoryMode, Market, MoneyFlowMode, ScanConfig, SnapshotRow, Universe};
use crate::services::{aggregate_sectors, load_series, write_report, IndicatorEngine, ScanReport};
use crate::utils::display_code;

pub fn run(
    market: String,
    as_of: Option<String>,
    lookback_days: i64,
    money_flow: String,
    favorites: Option<String>,
) {
    let market = match Market::from_str(&market) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut config = ScanConfig::for_market(market);
    config.lookback_days = lookback_days;

    if let Some(date) = as_of {
        match ScanConfig::parse_date(&date) {
            Ok(d) => config.as_of = d,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    }

    match MoneyFlowMode::from_str(&money_flow) {
        Ok(mode) => config.money_flow_mode = mode,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Valid options: volume_ratio, price_weighted");
            std::process::exit(1);
        }
    }

    config.favorites = favorites.map(|f| ScanConfig::parse_favorites(&f));

    println!(
        "🔍 Scanning {} market as of {} ({} day window)",
        market.as_str().to_uppercase(),
        config.as_of,
        config.lookback_days
    );

    let start = Instant::now();
    match execute(&config, true) {
        Ok(report) => {
            println!("\n✅ {} instruments scanned in {:.1}s", report.rows.len(), start.elapsed().as_secs_f64());
            if !report.skipped.is_empty() {
                println!("⚠️  Skipped {}: {}", report.skipped.len(), report.skipped.join(", "));
            }
            println!("📁 Report written to {}", config.report_dir.display());
        }
        Err(e) => {
            eprintln!("❌ Scan failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Load, compute, aggregate and write one market's report
///
/// Instruments that fail are logged and left out. Fails only when no
/// instrument produces a snapshot.
pub fn execute(config: &ScanConfig, show_progress: bool) -> Result<ScanReport> {
    let mut universe = Universe::from_file(&config.universe_path).map_err(|e| {
        AppError::Config(format!(
            "Failed to load universe {}: {}",
            config.universe_path.display(),
            e
        ))
    })?;

    if let Some(favorites) = &config.favorites {
        universe = universe.with_favorites(favorites.clone());
    }

    let tickers = universe.tickers();

    for favorite in &universe.favorites {
        let code = display_code(favorite);
        if !tickers.iter().any(|t| display_code(t) == code) {
            warn!(code = %favorite, "Favourite not in universe");
        }
    }

    info!(
        market = config.market.as_str(),
        instruments = tickers.len(),
        as_of = %config.as_of,
        "Starting scan"
    );

    let pb = if show_progress {
        let pb = ProgressBar::new(tickers.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let engine = IndicatorEngine::new(config.money_flow_mode);
    let window_start = config.window_start();

    let results: Vec<(String, Result<SnapshotRow>)> = tickers
        .par_iter()
        .map(|ticker| {
            let outcome = scan_ticker(config, &universe, &engine, ticker, window_start);
            pb.inc(1);
            (ticker.clone(), outcome)
        })
        .collect();

    pb.finish_and_clear();

    let mut rows = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (ticker, outcome) in results {
        match outcome {
            Ok(row) => rows.push(row),
            Err(e) if e.is_skippable() => {
                warn!(ticker = %ticker, reason = %e, "Skipping instrument");
                skipped.push(ticker);
            }
            Err(e) => {
                error!(ticker = %ticker, reason = %e, "Failed to scan instrument");
                skipped.push(ticker);
            }
        }
    }

    if rows.is_empty() {
        return Err(AppError::Other(format!(
            "No instrument produced a snapshot ({} tried)",
            tickers.len()
        )));
    }

    rows.sort_by(|a, b| a.code.cmp(&b.code));
    let sectors = aggregate_sectors(&rows);

    let report = ScanReport {
        market: config.market,
        as_of: config.as_of,
        rows,
        sectors,
        skipped,
    };

    write_report(&report, &config.report_dir)?;

    info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "Scan complete"
    );

    Ok(report)
}

fn scan_ticker(
    config: &ScanConfig,
    universe: &Universe,
    engine: &IndicatorEngine,
    ticker: &str,
    window_start: NaiveDate,
) -> Result<SnapshotRow> {
    let info = universe
        .get(ticker)
        .ok_or_else(|| AppError::NotFound(format!("{} not in universe", ticker)))?;

    let favorite = universe.is_favorite(ticker);
    let mode = if favorite {
        HistoryMode::Relaxed
    } else {
        HistoryMode::Standard
    };

    let series = load_series(&config.data_dir, ticker, window_start, config.as_of)?;
    let snapshot = engine.compute(&series, mode)?;

    Ok(SnapshotRow::new(snapshot, info, favorite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{report_file, DAILY_FILENAME};
    use chrono::{Duration, NaiveDate};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const UNIVERSE: &str = r#"{
        "favorites": ["2330"],
        "instruments": {
            "2330.TW": {"name": "TSMC", "name_local": "台積電", "sector": "Foundry - Logic"},
            "2317.TW": {"name": "Hon Hai", "sector": "EMS"},
            "2454.TW": {"name": "MediaTek", "sector": "IC Design"}
        }
    }"#;

    fn write_bars(root: &Path, ticker: &str, count: usize, start: NaiveDate) {
        let dir = root.join(ticker);
        fs::create_dir_all(&dir).unwrap();
        let mut body = "ticker,time,open,high,low,close,volume\n".to_string();
        for i in 0..count {
            let date = start + Duration::days(i as i64);
            let close = 100.0 + i as f64;
            body.push_str(&format!(
                "{ticker},{date},{close},{},{},{close},{}\n",
                close + 1.0,
                close - 1.0,
                1000 + i * 10
            ));
        }
        fs::write(dir.join(DAILY_FILENAME), body).unwrap();
    }

    fn config(tmp: &TempDir, as_of: NaiveDate) -> ScanConfig {
        let universe_path = tmp.path().join("universe_tw.json");
        fs::write(&universe_path, UNIVERSE).unwrap();

        ScanConfig {
            market: Market::Tw,
            as_of,
            lookback_days: 60,
            money_flow_mode: MoneyFlowMode::VolumeRatio,
            favorites: None,
            data_dir: tmp.path().join("data"),
            universe_path,
            report_dir: tmp.path().join("reports"),
        }
    }

    #[test]
    fn test_scan_skips_short_history() {
        let tmp = TempDir::new().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let data = tmp.path().join("data");
        write_bars(&data, "2317.TW", 30, start);
        write_bars(&data, "2454.TW", 5, start + Duration::days(25));
        // Favourite with 12 bars still qualifies under the relaxed minimum
        write_bars(&data, "2330.TW", 12, start + Duration::days(18));

        let cfg = config(&tmp, start + Duration::days(29));
        let report = execute(&cfg, false).unwrap();

        let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["2317", "2330"]);
        assert_eq!(report.skipped, vec!["2454.TW"]);

        let tsmc = &report.rows[1];
        assert!(tsmc.favorite);
        assert!(tsmc.quick_action.is_some());
        assert_eq!(tsmc.snapshot.as_of, start + Duration::days(29));

        for file in [
            report_file::DAILY_SIGNALS,
            report_file::TREND,
            report_file::SECTOR_FLOW,
            report_file::FAVORITES,
            report_file::SNAPSHOTS,
        ] {
            assert!(cfg.report_dir.join(file).exists(), "{} missing", file);
        }
    }

    #[test]
    fn test_as_of_cuts_later_bars() {
        let tmp = TempDir::new().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let data = tmp.path().join("data");
        write_bars(&data, "2317.TW", 40, start);

        let as_of = start + Duration::days(30);
        let report = execute(&config(&tmp, as_of), false).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].snapshot.as_of, as_of);
        assert_eq!(report.rows[0].snapshot.price, 130.0);
    }

    #[test]
    fn test_favorites_override() {
        let tmp = TempDir::new().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let data = tmp.path().join("data");
        write_bars(&data, "2317.TW", 30, start);
        write_bars(&data, "2330.TW", 30, start);

        let mut cfg = config(&tmp, start + Duration::days(29));
        cfg.favorites = Some(vec!["2317".to_string()]);
        let report = execute(&cfg, false).unwrap();

        let favorites: Vec<&str> = report.favorites().map(|r| r.code.as_str()).collect();
        assert_eq!(favorites, vec!["2317"]);
    }

    #[test]
    fn test_zero_rows_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        fs::create_dir_all(&cfg.data_dir).unwrap();

        let err = execute(&cfg, false).unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
        assert!(!cfg.report_dir.join(report_file::SNAPSHOTS).exists());
    }

    #[test]
    fn test_missing_universe_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = config(&tmp, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        cfg.universe_path = tmp.path().join("absent.json");
        assert!(matches!(execute(&cfg, false), Err(AppError::Config(_))));
    }
}
