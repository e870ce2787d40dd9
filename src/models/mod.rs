mod market;
mod price_bar;
mod price_series;
mod quick_action;
mod row;
mod scan_config;
mod sector;
mod snapshot;
mod universe;
pub mod indicators;

pub use market::Market;
pub use price_bar::PriceBar;
pub use price_series::PriceSeries;
pub use quick_action::QuickAction;
pub use row::SnapshotRow;
#[cfg(test)]
pub(crate) use row::test_row;
pub use scan_config::ScanConfig;
pub use sector::SectorAggregate;
pub use snapshot::{DaySignal, HistoryMode, IndicatorSnapshot, MoneyFlowMode, TechnicalIndicators};
pub use universe::{InstrumentInfo, Universe};
