use clap::{Parser, Subcommand};

use crate::commands;
use crate::constants::DEFAULT_LOOKBACK_DAYS;

#[derive(Parser)]
#[command(name = "smartflow")]
#[command(about = "Smart money flow scanner for Taiwan and Vietnam equities", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute snapshots for a market and write the report tables
    Scan {
        /// Market: tw or vn
        #[arg(short, long, default_value = "vn")]
        market: String,

        /// Last day of the window (YYYY-MM-DD), defaults to today on the exchange calendar
        #[arg(long)]
        as_of: Option<String>,

        /// Calendar days of history to load
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: i64,

        /// Money-flow formula: volume_ratio or price_weighted
        #[arg(long, default_value = "volume_ratio")]
        money_flow: String,

        /// Comma-separated favourites, overriding the universe file
        #[arg(short, long)]
        favorites: Option<String>,
    },
    /// Print ranking screens from the last report
    Screen {
        /// Market: tw or vn
        #[arg(short, long, default_value = "vn")]
        market: String,

        /// Sector for the weakest-flow table
        #[arg(short, long)]
        sector: Option<String>,

        /// Rows in the Quadrant 1 table
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show data directory and report status
    Status {
        /// Market: tw or vn (both when omitted)
        #[arg(short, long)]
        market: Option<String>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            market,
            as_of,
            lookback_days,
            money_flow,
            favorites,
        } => {
            commands::scan::run(market, as_of, lookback_days, money_flow, favorites);
        }
        Commands::Screen { market, sector, limit } => {
            commands::screen::run(market, sector, limit);
        }
        Commands::Status { market } => {
            commands::status::run(market);
        }
    }
}
