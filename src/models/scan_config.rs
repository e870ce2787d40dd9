use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

use crate::constants::DEFAULT_LOOKBACK_DAYS;
use crate::models::{Market, MoneyFlowMode};

/// Configuration for one batch scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Market to scan
    pub market: Market,

    /// Last calendar day included in the trailing window (exchange-local)
    pub as_of: NaiveDate,

    /// Calendar days of history handed to the engine
    pub lookback_days: i64,

    /// Formula for the money-flow strength column
    pub money_flow_mode: MoneyFlowMode,

    /// Overrides the universe's favourites when set
    pub favorites: Option<Vec<String>>,

    /// Per-ticker CSV root
    pub data_dir: PathBuf,

    /// Universe JSON path
    pub universe_path: PathBuf,

    /// Output directory for report tables
    pub report_dir: PathBuf,
}

impl ScanConfig {
    /// Defaults for a market: today on the exchange calendar, 60-day window
    pub fn for_market(market: Market) -> Self {
        Self {
            market,
            as_of: market.today(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            money_flow_mode: MoneyFlowMode::default(),
            favorites: None,
            data_dir: market.get_data_dir(),
            universe_path: market.get_universe_path(),
            report_dir: market.get_report_dir(),
        }
    }

    /// Exclusive start of the trailing window
    pub fn window_start(&self) -> NaiveDate {
        self.as_of - Duration::days(self.lookback_days)
    }

    /// Parse a `YYYY-MM-DD` date argument
    pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}': {} (expected YYYY-MM-DD)", s, e))
    }

    /// Parse a comma-separated favourites list, dropping blanks
    pub fn parse_favorites(s: &str) -> Vec<String> {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::for_market(Market::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start() {
        let mut config = ScanConfig::for_market(Market::Tw);
        config.as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(config.window_start(), NaiveDate::from_ymd_opt(2025, 1, 30).unwrap());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            ScanConfig::parse_date("2025-02-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
        );
        assert!(ScanConfig::parse_date("14/02/2025").is_err());
    }

    #[test]
    fn test_parse_favorites() {
        assert_eq!(
            ScanConfig::parse_favorites("2330, 2317,,8299 "),
            vec!["2330", "2317", "8299"]
        );
        assert!(ScanConfig::parse_favorites("").is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.market, Market::Vn);
        assert_eq!(config.lookback_days, 60);
        assert_eq!(config.money_flow_mode, MoneyFlowMode::VolumeRatio);
        assert!(config.favorites.is_none());
    }
}
