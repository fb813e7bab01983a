//! Core types and traits for the equity screener.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Tickers and fundamental / open-interest snapshots
//! - Core traits for indicators and market data providers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ScreenerError, ScreenerResult};
pub use traits::*;
pub use types::*;
