use serde::{Deserialize, Serialize};

/// Per-sector roll-up of the snapshot rows sharing a sector label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector: String,

    /// Mean of the members' 1-month % change
    pub mean_pct_1month: f64,

    /// Mean of the members' money-flow strength
    pub mean_money_flow: f64,

    /// Sum of the members' average trading value (local currency)
    pub total_trading_value: f64,

    /// Number of members
    pub count: usize,
}
