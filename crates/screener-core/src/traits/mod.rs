//! Core traits for the screener.

mod data_source;
mod indicator;

pub use data_source::{MarketDataProvider, OptionChainSource};
pub use indicator::{BarIndicator, Indicator, MultiOutputIndicator};
