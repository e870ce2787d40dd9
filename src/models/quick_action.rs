use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::quick_action as limits;
use crate::models::IndicatorSnapshot;

/// One-word recommendation for a watched ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickAction {
    /// Strong up day on heavy volume
    BuyStrong,
    /// Short-term volume more than double the 20-day baseline
    StrongInflow,
    /// Extended month followed by a red day
    TakeProfit,
    /// Heavy selling
    Exit,
    Watch,
}

impl QuickAction {
    /// Rules are checked in order and the first match wins
    pub fn classify(snapshot: &IndicatorSnapshot) -> Self {
        Self::from_fields(
            snapshot.day_change_pct,
            snapshot.vol_vs_avg_pct,
            snapshot.money_flow_strength,
            snapshot.pct_1month,
        )
    }

    pub fn from_fields(day_change_pct: f64, vol_vs_avg_pct: f64, money_flow: f64, pct_1month: f64) -> Self {
        if day_change_pct > limits::BUY_STRONG_DAY_CHANGE && vol_vs_avg_pct > limits::BUY_STRONG_VOL_VS_AVG {
            QuickAction::BuyStrong
        } else if money_flow > limits::STRONG_INFLOW_MONEY_FLOW {
            QuickAction::StrongInflow
        } else if pct_1month > limits::TAKE_PROFIT_MONTH_CHANGE
            && day_change_pct < limits::TAKE_PROFIT_DAY_CHANGE
        {
            QuickAction::TakeProfit
        } else if day_change_pct < limits::EXIT_DAY_CHANGE && vol_vs_avg_pct > limits::EXIT_VOL_VS_AVG {
            QuickAction::Exit
        } else {
            QuickAction::Watch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickAction::BuyStrong => "BUY_STRONG",
            QuickAction::StrongInflow => "STRONG_INFLOW",
            QuickAction::TakeProfit => "TAKE_PROFIT",
            QuickAction::Exit => "EXIT",
            QuickAction::Watch => "WATCH",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
