use crate::error::Result;
use crate::models::{Market, Universe};
use crate::services::{self, load_report};

pub fn run(market: Option<String>) {
    let markets = match market {
        Some(m) => match Market::from_str(&m) {
            Ok(m) => vec![m],
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => vec![Market::Tw, Market::Vn],
    };

    println!("📊 Market Data Status\n");

    for market in markets {
        if let Err(e) = show_status(market) {
            eprintln!("❌ Error ({}): {}", market.as_str(), e);
            std::process::exit(1);
        }
        println!("\n═══════════════════════════════════════════════════════════\n");
    }
}

fn show_status(market: Market) -> Result<()> {
    let data_dir = market.get_data_dir();
    let universe_path = market.get_universe_path();

    println!("🔹 {} ({})", market.as_str().to_uppercase(), market.timezone());
    println!("   Data:     {}", data_dir.display());
    println!("   Universe: {}", universe_path.display());

    let universe = match Universe::from_file(&universe_path) {
        Ok(u) => u,
        Err(e) => {
            println!("   ⚠️  Universe not loaded: {}", e);
            return Ok(());
        }
    };

    println!(
        "   Instruments: {} in {} sectors, {} favourites",
        format_number(universe.instrument_count()),
        universe.sector_names().len(),
        universe.favorites.len()
    );

    let stats = services::get_market_stats(&data_dir, &universe)?;
    if !stats.has_data {
        println!("   ⚠️  No market data found");
        return Ok(());
    }

    println!("   Ticker dirs: {}", format_number(stats.total_tickers));
    if let Some(latest) = stats.latest_date {
        println!("   Latest bar:  {}", latest);
    }
    if !stats.missing.is_empty() {
        println!("   ⚠️  Missing ({}): {}", stats.missing.len(), stats.missing.join(", "));
    }
    if !stats.stale.is_empty() {
        println!("   ⚠️  Stale ({}): {}", stats.stale.len(), stats.stale.join(", "));
    }

    match load_report(&market.get_report_dir()) {
        Ok(report) => println!(
            "   Last report: as of {}, {} rows, {} skipped",
            report.as_of,
            report.rows.len(),
            report.skipped.len()
        ),
        Err(_) => println!("   Last report: none"),
    }

    Ok(())
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
