//! Sector roll-up of snapshot rows
//!
//! Group-by-reduce over the sector label: mean 1-month change, mean money
//! flow, summed average trading value and member count. Output is sorted by
//! mean 1-month change, strongest first.

use std::collections::BTreeMap;

use crate::models::{SectorAggregate, SnapshotRow};

#[derive(Default)]
struct Accumulator {
    pct_1month_sum: f64,
    money_flow_sum: f64,
    trading_value_sum: f64,
    count: usize,
}

/// Aggregate rows by sector
///
/// Sectors only appear when they have at least one row. Ties on the mean
/// 1-month change are broken by sector name.
pub fn aggregate_sectors(rows: &[SnapshotRow]) -> Vec<SectorAggregate> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for row in rows {
        let acc = groups.entry(row.sector.as_str()).or_default();
        acc.pct_1month_sum += row.snapshot.pct_1month;
        acc.money_flow_sum += row.snapshot.money_flow_strength;
        acc.trading_value_sum += row.snapshot.avg_trading_value;
        acc.count += 1;
    }

    let mut sectors: Vec<SectorAggregate> = groups
        .into_iter()
        .map(|(sector, acc)| SectorAggregate {
            sector: sector.to_string(),
            mean_pct_1month: acc.pct_1month_sum / acc.count as f64,
            mean_money_flow: acc.money_flow_sum / acc.count as f64,
            total_trading_value: acc.trading_value_sum,
            count: acc.count,
        })
        .collect();

    // Stable sort keeps the name order from the BTreeMap for ties
    sectors.sort_by(|a, b| {
        b.mean_pct_1month
            .partial_cmp(&a.mean_pct_1month)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    sectors
}
