pub mod bar_loader;
pub mod indicator_engine;
pub mod market_stats;
pub mod report;
pub mod screens;
mod sector_aggregator;

pub use bar_loader::{list_ticker_dirs, load_series, read_daily_csv};
pub use indicator_engine::{compute_snapshot, compute_technical, IndicatorEngine};
pub use market_stats::{get_market_stats, get_ticker_info, MarketStats, TickerInfo};
pub use report::{load_report, write_report, ScanReport};
pub use screens::{
    bucket_counts, favorites_summary, quadrant_one, top_volume_spikes, weakest_flow, DayMove,
    FavoritesSummary, FlowStrength, Momentum, MonthTrend, QuadrantOne,
};
pub use sector_aggregator::aggregate_sectors;
