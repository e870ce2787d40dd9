//! Market selector for scans and screens
//!
//! Determines data directory, universe file, timezone and report location.
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{get_dir_from_env, get_report_root, get_universe_dir};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Taiwan (TWSE / TPEx)
    ///
    /// Data source: market_data/tw/
    #[serde(alias = "taiwan")]
    Tw,

    /// Vietnam (HOSE / HNX / UPCOM)
    ///
    /// Data source: market_data/vn/
    #[serde(alias = "vietnam")]
    Vn,
}

impl Default for Market {
    fn default() -> Self {
        Market::Vn
    }
}

impl Market {
    /// Get data directory path for this market
    pub fn get_data_dir(&self) -> PathBuf {
        match self {
            Market::Tw => get_dir_from_env("TW_DATA_DIR", "market_data/tw"),
            Market::Vn => get_dir_from_env("VN_DATA_DIR", "market_data/vn"),
        }
    }

    /// Get universe file name
    pub fn get_universe_file(&self) -> &'static str {
        match self {
            Market::Tw => "universe_tw.json",
            Market::Vn => "universe_vn.json",
        }
    }

    pub fn get_universe_path(&self) -> PathBuf {
        get_universe_dir().join(self.get_universe_file())
    }

    /// Directory receiving the report tables for this market
    pub fn get_report_dir(&self) -> PathBuf {
        get_report_root().join(self.as_str())
    }

    /// IANA timezone of the exchange
    pub fn timezone(&self) -> Tz {
        match self {
            Market::Tw => chrono_tz::Asia::Taipei,
            Market::Vn => chrono_tz::Asia::Ho_Chi_Minh,
        }
    }

    /// Today's date on the exchange calendar
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone()).date_naive()
    }

    /// Rows in the volume-spike table
    pub fn volume_spike_limit(&self) -> usize {
        match self {
            Market::Tw => 12,
            Market::Vn => 15,
        }
    }

    /// Local currency code for trading value
    pub fn currency(&self) -> &'static str {
        match self {
            Market::Tw => "TWD",
            Market::Vn => "VND",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "tw" | "taiwan" => Ok(Market::Tw),
            "vn" | "vietnam" => Ok(Market::Vn),
            _ => Err(format!("Invalid market: '{}'. Valid values: tw, vn", s)),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Tw => "tw",
            Market::Vn => "vn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_default() {
        assert_eq!(Market::default(), Market::Vn);
    }

    #[test]
    fn test_market_from_str() {
        assert_eq!(Market::from_str("tw").unwrap(), Market::Tw);
        assert_eq!(Market::from_str("Taiwan").unwrap(), Market::Tw);
        assert_eq!(Market::from_str("VN").unwrap(), Market::Vn);
        assert_eq!(Market::from_str("vietnam").unwrap(), Market::Vn);
        assert!(Market::from_str("jp").is_err());
    }

    #[test]
    fn test_market_files() {
        assert_eq!(Market::Tw.get_universe_file(), "universe_tw.json");
        assert_eq!(Market::Vn.get_universe_file(), "universe_vn.json");
        assert_eq!(Market::Tw.volume_spike_limit(), 12);
        assert_eq!(Market::Vn.volume_spike_limit(), 15);
    }

    #[test]
    fn test_market_timezone() {
        assert_eq!(Market::Tw.timezone().name(), "Asia/Taipei");
        assert_eq!(Market::Vn.timezone().name(), "Asia/Ho_Chi_Minh");
    }

    #[test]
    fn test_market_serialize() {
        assert_eq!(serde_json::to_string(&Market::Tw).unwrap(), r#""tw""#);
        let vn: Market = serde_json::from_str(r#""vietnam""#).unwrap();
        assert_eq!(vn, Market::Vn);
    }
}
