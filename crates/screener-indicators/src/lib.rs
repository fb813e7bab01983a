//! Technical indicators used by the screener.
//!
//! This crate provides implementations of the indicators every scan profile
//! draws from:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (ATR)
//! - Rolling high-water marks
//! - Volume indicators (accumulation/distribution)
//!
//! The hot loops over window sums and money-flow volume have SIMD versions
//! built on `wide`.

pub mod momentum;
pub mod moving_average;
pub mod rolling;
pub mod simd;
pub mod volatility;
pub mod volume;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use rolling::RollingHigh;
pub use volatility::Atr;
pub use volume::AccumulationDistribution;
