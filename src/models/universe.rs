use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::utils::display_code;

/// Static metadata for one listed instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    /// English display name
    pub name: String,

    /// Name in the local script (e.g. 台積電), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,

    /// Sector label used for grouping
    pub sector: String,

    /// Listing venue (HOSE, HNX, UPCOM, TWSE, TPEx)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

/// Curated ticker list for one market, loaded once at start-up
///
/// Keys are data-source tickers (e.g. `2330.TW`); favourites are listed by
/// display code (`2330`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Universe {
    #[serde(default)]
    pub favorites: Vec<String>,

    pub instruments: BTreeMap<String, InstrumentInfo>,
}

impl Universe {
    /// Load universe from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let universe: Universe = serde_json::from_str(content)?;
        Ok(universe)
    }

    /// All data-source tickers, sorted
    pub fn tickers(&self) -> Vec<String> {
        self.instruments.keys().cloned().collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&InstrumentInfo> {
        self.instruments.get(ticker)
    }

    /// Whether a ticker is on the favourites list (compared by display code)
    pub fn is_favorite(&self, ticker: &str) -> bool {
        let code = display_code(ticker);
        self.favorites.iter().any(|f| display_code(f) == code)
    }

    /// Replace the favourites list (CLI override)
    pub fn with_favorites(mut self, favorites: Vec<String>) -> Self {
        self.favorites = favorites;
        self
    }

    /// Tickers grouped by sector label
    pub fn sectors(&self) -> HashMap<String, Vec<String>> {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for (ticker, info) in &self.instruments {
            groups.entry(info.sector.clone()).or_default().push(ticker.clone());
        }
        groups
    }

    /// Get all sector names
    pub fn sector_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sectors().into_keys().collect();
        names.sort();
        names
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }
}
