use serde::{Deserialize, Serialize};

use crate::models::{IndicatorSnapshot, InstrumentInfo, QuickAction};
use crate::utils::display_code;

/// A snapshot joined with its static metadata, one per report line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Display code ("2330", "FPT")
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    pub favorite: bool,
    /// Only set for favourites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_action: Option<QuickAction>,
    pub snapshot: IndicatorSnapshot,
}

impl SnapshotRow {
    pub fn new(snapshot: IndicatorSnapshot, info: &InstrumentInfo, favorite: bool) -> Self {
        let quick_action = favorite.then(|| QuickAction::classify(&snapshot));

        Self {
            code: display_code(&snapshot.ticker).to_string(),
            name: info.name.clone(),
            name_local: info.name_local.clone(),
            sector: info.sector.clone(),
            exchange: info.exchange.clone(),
            favorite,
            quick_action,
            snapshot,
        }
    }

    /// Local-script name when present, else the English name
    pub fn display_name(&self) -> &str {
        self.name_local.as_deref().unwrap_or(&self.name)
    }

    /// Quick action, computing it on demand for non-favourites
    pub fn action(&self) -> QuickAction {
        self.quick_action
            .unwrap_or_else(|| QuickAction::classify(&self.snapshot))
    }
}

/// Row with the ranking fields set and everything else neutral
#[cfg(test)]
pub(crate) fn test_row(
    code: &str,
    sector: &str,
    day_change_pct: f64,
    vol_vs_avg_pct: f64,
    pct_1month: f64,
    money_flow_strength: f64,
) -> SnapshotRow {
    use crate::models::{DaySignal, TechnicalIndicators};

    let snapshot = IndicatorSnapshot {
        ticker: code.to_string(),
        as_of: chrono::NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
        price: 100.0,
        day_change_pct,
        vol_vs_avg_pct,
        pct_1month,
        money_flow_strength,
        avg_trading_value: 1e9,
        indicators: TechnicalIndicators::neutral(),
        signal: DaySignal::Weak,
        degraded: false,
    };
    let info = InstrumentInfo {
        name: format!("{} Corp", code),
        name_local: None,
        sector: sector.to_string(),
        exchange: None,
    };
    SnapshotRow::new(snapshot, &info, false)
}
