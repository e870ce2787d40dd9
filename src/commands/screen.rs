use crate::constants::{quadrant, TRADING_VALUE_DIVISOR, WEAKEST_FLOW_LIMIT};
use crate::error::Result;
use crate::models::{Market, SnapshotRow};
use crate::services::{
    bucket_counts, favorites_summary, load_report, quadrant_one, top_volume_spikes, weakest_flow,
    DayMove, MonthTrend, ScanReport,
};

pub fn run(market: String, sector: Option<String>, limit: Option<usize>) {
    let market = match Market::from_str(&market) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = show_screens(market, sector, limit.unwrap_or(quadrant::DEFAULT_LIMIT)) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn show_screens(market: Market, sector: Option<String>, limit: usize) -> Result<()> {
    let report = load_report(&market.get_report_dir())?;

    println!(
        "📊 {} Smart Money Flow as of {} ({} instruments, {})\n",
        market.as_str().to_uppercase(),
        report.as_of,
        report.rows.len(),
        market.currency()
    );

    show_quadrant_one(&report, limit);
    show_volume_spikes(&report, market.volume_spike_limit());
    show_sectors(&report);
    show_weakest(&report, sector.as_deref());
    show_buckets(&report.rows);
    show_favorites(&report);

    Ok(())
}

fn separator() {
    println!("\n═══════════════════════════════════════════════════════════\n");
}

fn show_quadrant_one(report: &ScanReport, limit: usize) {
    let q1 = quadrant_one(&report.rows, limit);

    println!("🚀 Quadrant 1: inflow with positive momentum ({} instruments)\n", q1.total);
    if q1.top.is_empty() {
        println!("   No instrument has money flow above 1.0 and a positive month");
        return;
    }

    for (i, entry) in q1.top.iter().enumerate() {
        let row = entry.row;
        println!(
            "   {:>2}. {:<8} {:<24} flow {:>5.2} ({:<11}) 1M {:>+7.2}% {}",
            i + 1,
            row.code,
            truncate(row.display_name(), 24),
            row.snapshot.money_flow_strength,
            entry.flow.to_string(),
            row.snapshot.pct_1month,
            entry.momentum
        );
    }

    println!(
        "\n   Mean flow {:.2}, mean 1M {:+.2}%",
        q1.mean_money_flow(),
        q1.mean_pct_1month()
    );
    let sectors: Vec<String> = q1
        .sector_counts()
        .into_iter()
        .map(|(sector, count)| format!("{} ({})", sector, count))
        .collect();
    println!("   Sectors: {}", sectors.join(", "));
    separator();
}

fn show_volume_spikes(report: &ScanReport, limit: usize) {
    println!("🔥 Volume spikes vs 20-day average\n");
    for row in top_volume_spikes(&report.rows, limit) {
        println!(
            "   {:<8} {:<24} {:>6.0}%  day {:>+6.2}%  {}",
            row.code,
            truncate(row.display_name(), 24),
            row.snapshot.vol_vs_avg_pct,
            row.snapshot.day_change_pct,
            row.snapshot.signal
        );
    }
    separator();
}

fn show_sectors(report: &ScanReport) {
    println!("🏭 Sector flow (by mean 1-month change)\n");
    println!(
        "   {:<28} {:>8} {:>6} {:>12} {:>5}",
        "Sector", "1M %", "Flow", "Value (bn)", "N"
    );
    for s in &report.sectors {
        println!(
            "   {:<28} {:>+8.2} {:>6.2} {:>12.3} {:>5}",
            truncate(&s.sector, 28),
            s.mean_pct_1month,
            s.mean_money_flow,
            s.total_trading_value / TRADING_VALUE_DIVISOR,
            s.count
        );
    }
    separator();
}

fn show_weakest(report: &ScanReport, sector: Option<&str>) {
    // Default to the strongest sector, where outflow is least expected
    let Some(sector) = sector.or_else(|| report.sectors.first().map(|s| s.sector.as_str())) else {
        return;
    };

    println!("🔻 Weakest money flow in {}\n", sector);
    let rows = weakest_flow(&report.rows, sector, WEAKEST_FLOW_LIMIT);
    if rows.is_empty() {
        println!("   ⚠️  No instruments in sector '{}'", sector);
    }
    for row in rows {
        println!(
            "   {:<8} {:<24} flow {:>5.2}  1M {:>+7.2}%",
            row.code,
            truncate(row.display_name(), 24),
            row.snapshot.money_flow_strength,
            row.snapshot.pct_1month
        );
    }
    separator();
}

fn show_buckets(rows: &[SnapshotRow]) {
    let refs: Vec<&SnapshotRow> = rows.iter().collect();

    println!("📈 Day moves");
    for (bucket, count) in bucket_counts(&refs, |r| DayMove::classify(r.snapshot.day_change_pct)) {
        println!("   {:<12} {:>4}", format!("{:?}", bucket), count);
    }

    println!("\n📅 1-month trend");
    for (bucket, count) in bucket_counts(&refs, |r| MonthTrend::classify(r.snapshot.pct_1month)) {
        println!("   {:<12} {:>4}", format!("{:?}", bucket), count);
    }
    separator();
}

fn show_favorites(report: &ScanReport) {
    let summary = favorites_summary(&report.rows);
    if summary.total == 0 {
        println!("⭐ No favourites in this report");
        return;
    }

    println!("⭐ Favourites ({})\n", summary.total);
    for row in report.favorites() {
        let ind = &row.snapshot.indicators;
        println!(
            "   {:<8} {:<20} day {:>+6.2}% 1M {:>+7.2}% RSI {:>5.1} Stoch {:>5.1} ATR {:>5.2}%  {}{}",
            row.code,
            truncate(row.display_name(), 20),
            row.snapshot.day_change_pct,
            row.snapshot.pct_1month,
            ind.rsi,
            ind.stochastic,
            ind.atr_pct,
            row.action(),
            if row.snapshot.degraded { " (neutral indicators)" } else { "" }
        );
    }

    println!(
        "\n   Mean day {:+.2}%, mean 1M {:+.2}%, {} up today, {} up >10% this month",
        summary.mean_day_change_pct, summary.mean_pct_1month, summary.advancing, summary.strong_month
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars - 1).chain(std::iter::once('…')).collect()
    }
}
