//! Market data provider traits.

use crate::error::DataError;
use crate::types::{Bar, FundamentalSnapshot, OpenInterestSummary, Ticker};
use async_trait::async_trait;

/// Source of daily price history and fundamentals.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the last `sessions` daily bars.
    ///
    /// Weekends and exchange holidays do not count against the window.
    ///
    /// # Returns
    /// At most `sessions` bars ordered from oldest to newest
    async fn daily_bars(&self, ticker: &Ticker, sessions: u32) -> Result<Vec<Bar>, DataError>;

    /// Fetch the current fundamentals snapshot.
    async fn fundamentals(&self, ticker: &Ticker) -> Result<FundamentalSnapshot, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Source of aggregated option-chain open interest.
#[async_trait]
pub trait OptionChainSource: Send + Sync {
    /// Fetch call and put open interest for the ticker's option chain.
    async fn open_interest(&self, ticker: &Ticker) -> Result<OpenInterestSummary, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatProvider;

    #[async_trait]
    impl MarketDataProvider for FlatProvider {
        async fn daily_bars(
            &self,
            _ticker: &Ticker,
            sessions: u32,
        ) -> Result<Vec<Bar>, DataError> {
            Ok((0..i64::from(sessions))
                .map(|i| Bar::new(i * 86_400_000, 10.0, 10.0, 10.0, 10.0, 100.0))
                .collect())
        }

        async fn fundamentals(&self, ticker: &Ticker) -> Result<FundamentalSnapshot, DataError> {
            Err(DataError::Unsupported(format!("fundamentals for {ticker}")))
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    #[tokio::test]
    async fn test_provider_object_safety() {
        let provider: Box<dyn MarketDataProvider> = Box::new(FlatProvider);
        let ticker = Ticker::parse("ITC").unwrap();

        let bars = provider.daily_bars(&ticker, 8).await.unwrap();
        assert_eq!(bars.len(), 8);
        assert!(provider.fundamentals(&ticker).await.is_err());
    }
}
