//! Window sizes, thresholds and report layout
//!
//! ## Indicator windows
//!
//! | Indicator           | Window |
//! |---------------------|--------|
//! | SMA / volume avg    | 20     |
//! | Short volume avg    | 5      |
//! | RSI, Stochastic, ATR| 14     |
//! | MACD fast / slow    | 12 / 26|
//! | 1-month lookback    | 21     |
//!
//! All windows count trading bars, not calendar days.

/// Minimum bars for a standard snapshot (index n-21 must exist plus one)
pub const MIN_BARS_STANDARD: usize = 22;

/// Minimum bars for a best-effort snapshot of a favourite ticker
pub const MIN_BARS_RELAXED: usize = 10;

pub const SMA_WINDOW: usize = 20;
pub const SHORT_VOLUME_WINDOW: usize = 5;
pub const RSI_WINDOW: usize = 14;
pub const STOCHASTIC_WINDOW: usize = 14;
pub const ATR_WINDOW: usize = 14;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const BOLLINGER_STD_MULTIPLIER: f64 = 2.0;

/// Bars back from the current bar used for the 1-month change (close[n-21])
pub const MONTH_LOOKBACK_BARS: usize = 21;

/// Default trailing calendar window handed to the loader
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Average trading value is reported in billions of local currency
pub const TRADING_VALUE_DIVISOR: f64 = 1e9;

/// Neutral values substituted when an indicator is undefined
pub mod neutral {
    pub const RSI: f64 = 50.0;
    pub const MACD: f64 = 0.0;
    pub const BB_POSITION: f64 = 50.0;
    pub const STOCHASTIC: f64 = 50.0;
    pub const ATR_PCT: f64 = 0.0;
    pub const VOL_TREND: f64 = 0.0;
}

/// Quick action thresholds (percent unless noted)
pub mod quick_action {
    pub const BUY_STRONG_DAY_CHANGE: f64 = 1.8;
    pub const BUY_STRONG_VOL_VS_AVG: f64 = 150.0;
    /// Money-flow ratio, not a percent
    pub const STRONG_INFLOW_MONEY_FLOW: f64 = 2.0;
    pub const TAKE_PROFIT_MONTH_CHANGE: f64 = 20.0;
    pub const TAKE_PROFIT_DAY_CHANGE: f64 = -1.5;
    pub const EXIT_DAY_CHANGE: f64 = -3.0;
    pub const EXIT_VOL_VS_AVG: f64 = 130.0;
}

/// Quadrant 1 screen: money flow above 1.0 with a positive month
pub mod quadrant {
    pub const MONEY_FLOW_FLOOR: f64 = 1.0;
    pub const MONTH_CHANGE_FLOOR: f64 = 0.0;
    pub const DEFAULT_LIMIT: usize = 10;
    pub const FLOW_VERY_STRONG: f64 = 1.5;
    pub const FLOW_STRONG: f64 = 1.2;
    pub const MOMENTUM_EXCELLENT: f64 = 15.0;
    pub const MOMENTUM_STRONG: f64 = 5.0;
}

/// Default number of rows in the weakest-flow table per sector
pub const WEAKEST_FLOW_LIMIT: usize = 5;

/// Favourites with a 1-month gain above this count as strong
pub const FAVORITE_STRONG_MONTH_PCT: f64 = 10.0;

/// Daily CSV file name inside each ticker directory
pub const DAILY_FILENAME: &str = "daily.csv";

/// Report file names (one per sheet)
pub mod report_file {
    pub const DAILY_SIGNALS: &str = "1_daily_signals.csv";
    pub const TREND: &str = "2_trend_21d.csv";
    pub const SECTOR_FLOW: &str = "3_sector_flow.csv";
    pub const FAVORITES: &str = "4_favorites.csv";
    pub const SNAPSHOTS: &str = "snapshots.json";
}

/// Column indices for the daily bar CSV (0-indexed)
pub mod csv_column {
    pub const TICKER: usize = 0;
    pub const TIME: usize = 1;
    pub const OPEN: usize = 2;
    pub const HIGH: usize = 3;
    pub const LOW: usize = 4;
    pub const CLOSE: usize = 5;
    pub const VOLUME: usize = 6;
}

/// Number of basic OHLCV columns (ticker, time, open, high, low, close, volume)
pub const CSV_BASIC_COLUMNS: usize = 7;
