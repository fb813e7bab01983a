//! Core data types for the screener.

mod fundamentals;
mod ohlcv;
mod ticker;

pub use fundamentals::{FundamentalSnapshot, OpenInterestSummary};
pub use ohlcv::{Bar, BarSeries};
pub use ticker::{Ticker, DEFAULT_MARKET_SUFFIX};
