//! Ranking screens over snapshot rows
//!
//! - Quadrant 1: money flow above 1.0 with a positive month, strongest flow first
//! - Volume spikes: highest volume vs 20-day average
//! - Weakest flow: lowest money flow inside one sector
//! - Favourites summary and day/month performance buckets

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{FAVORITE_STRONG_MONTH_PCT, quadrant};
use crate::models::SnapshotRow;

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Money-flow band for Quadrant 1 members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStrength {
    VeryStrong,
    Strong,
    Good,
}

impl FlowStrength {
    pub fn classify(money_flow: f64) -> Self {
        if money_flow > quadrant::FLOW_VERY_STRONG {
            FlowStrength::VeryStrong
        } else if money_flow > quadrant::FLOW_STRONG {
            FlowStrength::Strong
        } else {
            FlowStrength::Good
        }
    }
}

impl fmt::Display for FlowStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlowStrength::VeryStrong => "VERY STRONG",
            FlowStrength::Strong => "STRONG",
            FlowStrength::Good => "GOOD",
        };
        write!(f, "{}", label)
    }
}

/// 1-month momentum band for Quadrant 1 members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Momentum {
    /// Above 15%
    Excellent,
    /// 5–15%
    Strong,
    /// 0–5%
    Positive,
}

impl Momentum {
    pub fn classify(pct_1month: f64) -> Self {
        if pct_1month > quadrant::MOMENTUM_EXCELLENT {
            Momentum::Excellent
        } else if pct_1month > quadrant::MOMENTUM_STRONG {
            Momentum::Strong
        } else {
            Momentum::Positive
        }
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Momentum::Excellent => "EXCELLENT (>15%)",
            Momentum::Strong => "STRONG (5-15%)",
            Momentum::Positive => "POSITIVE (0-5%)",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadrantEntry<'a> {
    pub row: &'a SnapshotRow,
    pub flow: FlowStrength,
    pub momentum: Momentum,
}

/// Result of the Quadrant 1 screen
#[derive(Debug, Clone, Serialize)]
pub struct QuadrantOne<'a> {
    /// Members before truncation
    pub total: usize,
    pub top: Vec<QuadrantEntry<'a>>,
}

impl QuadrantOne<'_> {
    /// Mean money flow over the listed entries
    pub fn mean_money_flow(&self) -> f64 {
        mean(self.top.iter().map(|e| e.row.snapshot.money_flow_strength))
    }

    /// Mean 1-month change over the listed entries
    pub fn mean_pct_1month(&self) -> f64 {
        mean(self.top.iter().map(|e| e.row.snapshot.pct_1month))
    }

    /// Member count per sector among the listed entries
    pub fn sector_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.top {
            *counts.entry(entry.row.sector.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Instruments with money flow above 1.0 and a positive 1-month change
pub fn quadrant_one(rows: &[SnapshotRow], limit: usize) -> QuadrantOne<'_> {
    let mut members: Vec<&SnapshotRow> = rows
        .iter()
        .filter(|r| {
            r.snapshot.money_flow_strength > quadrant::MONEY_FLOW_FLOOR
                && r.snapshot.pct_1month > quadrant::MONTH_CHANGE_FLOOR
        })
        .collect();

    let total = members.len();
    members.sort_by(|a, b| desc(a.snapshot.money_flow_strength, b.snapshot.money_flow_strength));
    members.truncate(limit);

    QuadrantOne {
        total,
        top: members
            .into_iter()
            .map(|row| QuadrantEntry {
                row,
                flow: FlowStrength::classify(row.snapshot.money_flow_strength),
                momentum: Momentum::classify(row.snapshot.pct_1month),
            })
            .collect(),
    }
}

/// Highest volume relative to the 20-day average
pub fn top_volume_spikes(rows: &[SnapshotRow], limit: usize) -> Vec<&SnapshotRow> {
    let mut ranked: Vec<&SnapshotRow> = rows.iter().collect();
    ranked.sort_by(|a, b| desc(a.snapshot.vol_vs_avg_pct, b.snapshot.vol_vs_avg_pct));
    ranked.truncate(limit);
    ranked
}

/// Lowest money flow within one sector
pub fn weakest_flow<'a>(rows: &'a [SnapshotRow], sector: &str, limit: usize) -> Vec<&'a SnapshotRow> {
    let mut ranked: Vec<&SnapshotRow> = rows.iter().filter(|r| r.sector == sector).collect();
    ranked.sort_by(|a, b| asc(a.snapshot.money_flow_strength, b.snapshot.money_flow_strength));
    ranked.truncate(limit);
    ranked
}

/// Headline numbers for the favourites table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritesSummary {
    pub total: usize,
    pub mean_day_change_pct: f64,
    pub mean_pct_1month: f64,
    /// Up on the day
    pub advancing: usize,
    /// Up more than 10% over the month
    pub strong_month: usize,
}

pub fn favorites_summary(rows: &[SnapshotRow]) -> FavoritesSummary {
    let favorites: Vec<&SnapshotRow> = rows.iter().filter(|r| r.favorite).collect();

    FavoritesSummary {
        total: favorites.len(),
        mean_day_change_pct: mean(favorites.iter().map(|r| r.snapshot.day_change_pct)),
        mean_pct_1month: mean(favorites.iter().map(|r| r.snapshot.pct_1month)),
        advancing: favorites.iter().filter(|r| r.snapshot.day_change_pct > 0.0).count(),
        strong_month: favorites
            .iter()
            .filter(|r| r.snapshot.pct_1month > FAVORITE_STRONG_MONTH_PCT)
            .count(),
    }
}

/// Day move bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayMove {
    /// Above +2%
    StrongUp,
    /// 0 to +2%
    MildUp,
    /// -2% to 0
    MildDown,
    /// Below -2%
    StrongDown,
}

impl DayMove {
    pub fn classify(day_change_pct: f64) -> Self {
        if day_change_pct > 2.0 {
            DayMove::StrongUp
        } else if day_change_pct > 0.0 {
            DayMove::MildUp
        } else if day_change_pct > -2.0 {
            DayMove::MildDown
        } else {
            DayMove::StrongDown
        }
    }
}

/// 1-month trend bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MonthTrend {
    StrongUp,
    ModerateUp,
    MildUp,
    MildDown,
    ModerateDown,
    StrongDown,
}

impl MonthTrend {
    pub fn classify(pct_1month: f64) -> Self {
        if pct_1month > 10.0 {
            MonthTrend::StrongUp
        } else if pct_1month > 5.0 {
            MonthTrend::ModerateUp
        } else if pct_1month > 0.0 {
            MonthTrend::MildUp
        } else if pct_1month > -5.0 {
            MonthTrend::MildDown
        } else if pct_1month > -10.0 {
            MonthTrend::ModerateDown
        } else {
            MonthTrend::StrongDown
        }
    }
}

/// Count rows per bucket; empty buckets are left out
pub fn bucket_counts<K: Ord>(rows: &[&SnapshotRow], bucket: impl Fn(&SnapshotRow) -> K) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(bucket(*row)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_row;

    fn codes(rows: &[&SnapshotRow]) -> Vec<String> {
        rows.iter().map(|r| r.code.clone()).collect()
    }

    #[test]
    fn test_quadrant_one_filter_and_order() {
        let rows = vec![
            test_row("AAA", "Tech", 0.0, 100.0, 4.0, 1.3),
            test_row("BBB", "Tech", 0.0, 100.0, 20.0, 1.8),
            test_row("CCC", "Bank", 0.0, 100.0, -1.0, 2.5), // negative month
            test_row("DDD", "Bank", 0.0, 100.0, 8.0, 1.0),  // flow not above 1.0
            test_row("EEE", "Bank", 0.0, 100.0, 0.5, 1.1),
        ];
        let q1 = quadrant_one(&rows, 10);

        assert_eq!(q1.total, 3);
        let listed: Vec<&str> = q1.top.iter().map(|e| e.row.code.as_str()).collect();
        assert_eq!(listed, vec!["BBB", "AAA", "EEE"]);
        assert_eq!(q1.top[0].flow, FlowStrength::VeryStrong);
        assert_eq!(q1.top[0].momentum, Momentum::Excellent);
        assert_eq!(q1.top[1].flow, FlowStrength::Strong);
        assert_eq!(q1.top[2].flow, FlowStrength::Good);
        assert_eq!(q1.top[2].momentum, Momentum::Positive);
        assert_eq!(q1.sector_counts()["Tech"], 2);
    }

    #[test]
    fn test_quadrant_one_limit_keeps_total() {
        let rows: Vec<SnapshotRow> = (0..15)
            .map(|i| test_row(&format!("T{i:02}"), "Tech", 0.0, 100.0, 1.0, 1.0 + i as f64 / 10.0 + 0.05))
            .collect();
        let q1 = quadrant_one(&rows, 10);
        assert_eq!(q1.total, 15);
        assert_eq!(q1.top.len(), 10);
        assert_eq!(q1.top[0].row.code, "T14");
        assert!((q1.mean_pct_1month() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_volume_spikes() {
        let rows = vec![
            test_row("A", "X", 0.0, 90.0, 0.0, 1.0),
            test_row("B", "X", 0.0, 310.0, 0.0, 1.0),
            test_row("C", "X", 0.0, 150.0, 0.0, 1.0),
        ];
        assert_eq!(codes(&top_volume_spikes(&rows, 2)), vec!["B", "C"]);
    }

    #[test]
    fn test_weakest_flow_within_sector() {
        let rows = vec![
            test_row("A", "Steel", 0.0, 100.0, 0.0, 0.9),
            test_row("B", "Steel", 0.0, 100.0, 0.0, 0.4),
            test_row("C", "Bank", 0.0, 100.0, 0.0, 0.1),
            test_row("D", "Steel", 0.0, 100.0, 0.0, 1.7),
        ];
        assert_eq!(codes(&weakest_flow(&rows, "Steel", 5)), vec!["B", "A", "D"]);
        assert!(weakest_flow(&rows, "Retail", 5).is_empty());
    }

    #[test]
    fn test_favorites_summary() {
        let mut rows = vec![
            test_row("A", "X", 1.0, 100.0, 12.0, 1.0),
            test_row("B", "X", -3.0, 100.0, 4.0, 1.0),
            test_row("C", "X", 5.0, 100.0, 30.0, 1.0),
        ];
        rows[0].favorite = true;
        rows[1].favorite = true;

        let summary = favorites_summary(&rows);
        assert_eq!(summary.total, 2);
        assert!((summary.mean_day_change_pct - (-1.0)).abs() < 1e-12);
        assert!((summary.mean_pct_1month - 8.0).abs() < 1e-12);
        assert_eq!(summary.advancing, 1);
        assert_eq!(summary.strong_month, 1);
    }

    #[test]
    fn test_favorites_summary_empty() {
        let summary = favorites_summary(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_day_change_pct, 0.0);
    }

    #[test]
    fn test_day_move_buckets() {
        assert_eq!(DayMove::classify(2.5), DayMove::StrongUp);
        assert_eq!(DayMove::classify(2.0), DayMove::MildUp);
        assert_eq!(DayMove::classify(0.0), DayMove::MildDown);
        assert_eq!(DayMove::classify(-2.0), DayMove::StrongDown);
    }

    #[test]
    fn test_month_trend_buckets() {
        assert_eq!(MonthTrend::classify(11.0), MonthTrend::StrongUp);
        assert_eq!(MonthTrend::classify(7.0), MonthTrend::ModerateUp);
        assert_eq!(MonthTrend::classify(0.1), MonthTrend::MildUp);
        assert_eq!(MonthTrend::classify(-5.0), MonthTrend::ModerateDown);
        assert_eq!(MonthTrend::classify(-12.0), MonthTrend::StrongDown);
    }

    #[test]
    fn test_bucket_counts() {
        let rows = vec![
            test_row("A", "X", 3.0, 100.0, 0.0, 1.0),
            test_row("B", "X", 4.0, 100.0, 0.0, 1.0),
            test_row("C", "X", -1.0, 100.0, 0.0, 1.0),
        ];
        let refs: Vec<&SnapshotRow> = rows.iter().collect();
        let counts = bucket_counts(&refs, |r| DayMove::classify(r.snapshot.day_change_pct));
        assert_eq!(counts[&DayMove::StrongUp], 2);
        assert_eq!(counts[&DayMove::MildDown], 1);
        assert!(!counts.contains_key(&DayMove::StrongDown));
    }
}
