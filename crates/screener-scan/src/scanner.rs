//! Sequential scan loop.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use screener_core::error::{DataError, ScanError};
use screener_core::traits::{MarketDataProvider, OptionChainSource};
use screener_core::types::{BarSeries, Ticker};
use screener_core::ScreenerResult;

use crate::condition::ScanContext;
use crate::profile::{ScanProfile, SortOrder};
use crate::report::ScanReport;
use crate::result::{ScanResult, SkippedTicker};
use crate::sentiment::LexiconScorer;
use crate::snapshot::{ChartSeries, IndicatorSnapshot};

/// Runs scan profiles against a market data provider.
///
/// Tickers are processed one at a time. An error on one ticker is logged
/// and recorded as skipped; the scan moves on to the next ticker.
pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    option_chain: Option<Arc<dyn OptionChainSource>>,
    sentiment: Option<f64>,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            option_chain: None,
            sentiment: None,
        }
    }

    pub fn with_option_chain(mut self, source: Arc<dyn OptionChainSource>) -> Self {
        self.option_chain = Some(source);
        self
    }

    /// Score the headlines once; every ticker in a scan shares the result.
    pub fn with_headlines<S: AsRef<str>>(mut self, scorer: &LexiconScorer, headlines: &[S]) -> Self {
        self.sentiment = scorer.mean_score(headlines);
        self
    }

    pub fn sentiment(&self) -> Option<f64> {
        self.sentiment
    }

    /// Scan every ticker with the profile.
    pub async fn run(&self, profile: &ScanProfile, universe: &str, tickers: &[Ticker]) -> ScanReport {
        info!(
            profile = %profile.name,
            universe = %universe,
            tickers = tickers.len(),
            provider = self.provider.name(),
            "Starting scan"
        );

        let mut report = ScanReport {
            profile: profile.name.clone(),
            universe: universe.to_string(),
            generated_at: Utc::now(),
            scanned: tickers.len(),
            results: Vec::with_capacity(tickers.len()),
            skipped: Vec::new(),
        };

        for ticker in tickers {
            match self.scan_ticker(profile, ticker).await {
                Ok(result) => {
                    debug!(
                        %ticker,
                        technical = result.scores.technical,
                        fundamental = result.scores.fundamental,
                        passed = result.passed,
                        "Scored ticker"
                    );
                    report.results.push(result);
                }
                Err(e) => {
                    warn!(%ticker, error = %e, "Skipping ticker");
                    report.skipped.push(SkippedTicker::new(ticker.as_str(), &e));
                }
            }
        }

        if profile.sort == SortOrder::RewardRiskDesc {
            report.sort_by_reward_risk();
        }

        info!(
            profile = %profile.name,
            candidates = report.candidates().count(),
            skipped = report.skipped.len(),
            "Scan complete"
        );

        report
    }

    /// Fetch, compute and score one ticker.
    pub async fn scan_ticker(&self, profile: &ScanProfile, ticker: &Ticker) -> ScreenerResult<ScanResult> {
        let bars = self.provider.daily_bars(ticker, profile.lookback_days).await?;
        let series = BarSeries::new(ticker.as_str(), bars);

        if series.len() < profile.min_bars {
            return Err(ScanError::InsufficientHistory {
                required: profile.min_bars,
                available: series.len(),
            }
            .into());
        }

        let (indicators, as_of) = match (IndicatorSnapshot::from_series(&series), series.last()) {
            (Some(snapshot), Some(last)) => (snapshot, last.date()),
            _ => return Err(DataError::NoDataAvailable(ticker.to_string()).into()),
        };

        let fundamentals = if profile.needs_fundamentals() {
            Some(self.provider.fundamentals(ticker).await?.sanitized())
        } else {
            None
        };

        let put_call_ratio = if profile.needs_option_chain() {
            let source = self
                .option_chain
                .as_ref()
                .ok_or_else(|| DataError::Unsupported("option chain source not configured".to_string()))?;
            source.open_interest(ticker).await?.put_call_ratio()
        } else {
            None
        };

        let ctx = ScanContext {
            indicators: &indicators,
            fundamentals: fundamentals.as_ref(),
            put_call_ratio,
            sentiment: self.sentiment,
        };
        let (scores, passed_conditions) = profile.score(&ctx);

        let levels = profile
            .levels
            .as_ref()
            .and_then(|method| method.derive(indicators.close, indicators.atr));

        let reward_risk_ok = match profile.min_reward_risk {
            Some(min) => levels.is_some_and(|l| l.reward_risk_f64() >= min),
            None => true,
        };

        Ok(ScanResult {
            ticker: ticker.clone(),
            as_of,
            close: indicators.close,
            passed: profile.pass.passes(&scores) && reward_risk_ok,
            indicators,
            fundamentals,
            put_call_ratio,
            scores,
            passed_conditions,
            levels,
            chart: ChartSeries::from_series(&series),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use screener_core::types::{Bar, FundamentalSnapshot, OpenInterestSummary};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::condition::Condition;
    use crate::levels::LevelMethod;
    use crate::profile::PassRule;
    use crate::registry::ProfileRegistry;

    const DAY: i64 = 86_400_000;

    #[derive(Default)]
    struct MemoryProvider {
        bars: HashMap<String, Vec<Bar>>,
        fundamentals_calls: AtomicUsize,
    }

    impl MemoryProvider {
        fn with(mut self, symbol: &str, closes: &[f64]) -> Self {
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as i64 * DAY, c, c + 1.0, c - 1.0, c, 10_000.0))
                .collect();
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        /// Bars with no range at all, so ATR is zero.
        fn with_flat(mut self, symbol: &str, close: f64, n: usize) -> Self {
            let bars = (0..n)
                .map(|i| Bar::new(i as i64 * DAY, close, close, close, close, 10_000.0))
                .collect();
            self.bars.insert(symbol.to_string(), bars);
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for MemoryProvider {
        async fn daily_bars(&self, ticker: &Ticker, _sessions: u32) -> Result<Vec<Bar>, DataError> {
            self.bars
                .get(ticker.as_str())
                .cloned()
                .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))
        }

        async fn fundamentals(&self, _ticker: &Ticker) -> Result<FundamentalSnapshot, DataError> {
            self.fundamentals_calls.fetch_add(1, Ordering::SeqCst);
            Ok(FundamentalSnapshot {
                trailing_pe: Some(12.0),
                price_to_book: Some(1.5),
                debt_to_equity: Some(0.2),
                return_on_equity: Some(0.21),
                earnings_growth: Some(0.3),
            })
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct FixedChain(OpenInterestSummary);

    #[async_trait]
    impl OptionChainSource for FixedChain {
        async fn open_interest(&self, _ticker: &Ticker) -> Result<OpenInterestSummary, DataError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn levels_profile(levels: LevelMethod, min_reward_risk: Option<f64>) -> ScanProfile {
        ScanProfile {
            name: "levels".to_string(),
            description: String::new(),
            lookback_days: 60,
            min_bars: 21,
            conditions: vec![Condition::WindowGainAtLeast { pct: 0.0 }],
            pass: PassRule::CombinedAtLeast { min: 1 },
            levels: Some(levels),
            min_reward_risk,
            sort: SortOrder::None,
        }
    }

    fn tickers(symbols: &[&str]) -> Vec<Ticker> {
        symbols.iter().map(|s| Ticker::parse(s).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_short_history_is_skipped_not_scored() {
        let provider = MemoryProvider::default()
            .with("SHORT.NS", &ramp(40))
            .with("LONG.NS", &ramp(60));
        let scanner = Scanner::new(Arc::new(provider));
        let registry = ProfileRegistry::new();
        let profile = registry.get("technical").unwrap();

        let report = scanner.run(profile, "test", &tickers(&["SHORT", "LONG"])).await;

        assert_eq!(report.scanned, 2);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].ticker.as_str(), "LONG.NS");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].ticker, "SHORT.NS");
        assert!(report.skipped[0].reason.contains("need 50 bars, have 40"));
        assert!(report.candidates().all(|r| r.ticker.as_str() != "SHORT.NS"));
    }

    #[tokio::test]
    async fn test_provider_error_does_not_stop_scan() {
        let provider = MemoryProvider::default().with("GOOD.NS", &ramp(60));
        let scanner = Scanner::new(Arc::new(provider));
        let registry = ProfileRegistry::new();

        let report = scanner
            .run(registry.get("technical").unwrap(), "test", &tickers(&["MISSING", "GOOD"]))
            .await;

        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("Symbol not found"));
        assert_eq!(report.results.len(), 1);
        // steady rise keeps RSI at 100, so the oversold rule fails
        assert!(!report.results[0].passed);
    }

    #[tokio::test]
    async fn test_weekly_gainer_passes() {
        let provider = MemoryProvider::default()
            .with("UP.NS", &[100.0, 103.0, 106.0, 108.0, 112.0, 115.0])
            .with("FLAT.NS", &[100.0, 101.0, 100.0, 102.0, 101.0, 103.0]);
        let scanner = Scanner::new(Arc::new(provider));
        let registry = ProfileRegistry::new();

        let report = scanner
            .run(registry.get("weekly-gainers").unwrap(), "test", &tickers(&["UP", "FLAT"]))
            .await;

        let candidates: Vec<_> = report.candidates().map(|r| r.ticker.as_str()).collect();
        assert_eq!(candidates, vec!["UP.NS"]);
        assert!((report.results[0].indicators.window_change_pct.unwrap() - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fundamentals_fetched_only_when_needed() {
        let provider = Arc::new(MemoryProvider::default().with("INFY.NS", &ramp(60)));
        let scanner = Scanner::new(provider.clone());
        let registry = ProfileRegistry::new();
        let ticker = Ticker::parse("INFY").unwrap();

        let technical = scanner
            .scan_ticker(registry.get("technical").unwrap(), &ticker)
            .await
            .unwrap();
        assert!(technical.fundamentals.is_none());
        assert_eq!(provider.fundamentals_calls.load(Ordering::SeqCst), 0);

        let fundamental = scanner
            .scan_ticker(registry.get("fundamental").unwrap(), &ticker)
            .await
            .unwrap();
        assert_eq!(provider.fundamentals_calls.load(Ordering::SeqCst), 1);
        // all five ratio checks pass
        assert_eq!(fundamental.scores.fundamental, 5);
    }

    #[tokio::test]
    async fn test_options_profile_needs_chain_source() {
        let provider = Arc::new(MemoryProvider::default().with("SBIN.NS", &ramp(60)));
        let registry = ProfileRegistry::new();
        let profile = registry.get("options").unwrap();
        let ticker = Ticker::parse("SBIN").unwrap();

        let bare = Scanner::new(provider.clone());
        let err = bare.scan_ticker(profile, &ticker).await.unwrap_err();
        assert!(err.to_string().contains("option chain"));

        let chain = FixedChain(OpenInterestSummary {
            call_oi: 100_000.0,
            put_oi: 150_000.0,
        });
        let scanner = Scanner::new(provider)
            .with_option_chain(Arc::new(chain))
            .with_headlines(&LexiconScorer::new(), &["Banking stocks rally on strong growth"]);
        let result = scanner.scan_ticker(profile, &ticker).await.unwrap();

        assert_eq!(result.put_call_ratio, Some(1.5));
        assert!(result.passed_conditions.contains(&"PCR>1".to_string()));
        assert!(result.passed_conditions.contains(&"Sentiment>=0.05".to_string()));
        assert!(result.passed);

        let levels = result.levels.unwrap();
        assert!(levels.stop_loss < levels.buy && levels.buy < levels.target);
    }

    #[tokio::test]
    async fn test_reward_risk_below_minimum_fails() {
        let provider = Arc::new(MemoryProvider::default().with("TCS.NS", &ramp(60)));
        let scanner = Scanner::new(provider);
        let ticker = Ticker::parse("TCS").unwrap();
        let even = LevelMethod::FixedPercent {
            stop_pct: 5.0,
            target_pct: 5.0,
        };

        let strict = levels_profile(even.clone(), Some(2.0));
        let result = scanner.scan_ticker(&strict, &ticker).await.unwrap();
        assert_eq!(result.scores.technical, 1);
        assert!((result.reward_risk().unwrap() - 1.0).abs() < 0.02);
        assert!(!result.passed);

        let loose = levels_profile(even, Some(0.5));
        assert!(scanner.scan_ticker(&loose, &ticker).await.unwrap().passed);
    }

    #[tokio::test]
    async fn test_missing_levels_fail_reward_risk_minimum() {
        let provider = Arc::new(MemoryProvider::default().with_flat("ITC.NS", 450.0, 60));
        let scanner = Scanner::new(provider);
        let ticker = Ticker::parse("ITC").unwrap();
        let atr = LevelMethod::Atr {
            stop_multiple: 1.0,
            reward_multiple: 3.0,
        };

        let result = scanner
            .scan_ticker(&levels_profile(atr.clone(), Some(2.0)), &ticker)
            .await
            .unwrap();
        assert_eq!(result.indicators.atr, Some(0.0));
        assert!(result.levels.is_none());
        assert_eq!(result.scores.technical, 1);
        assert!(!result.passed);

        // without a minimum the missing levels do not matter
        let result = scanner
            .scan_ticker(&levels_profile(atr, None), &ticker)
            .await
            .unwrap();
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_swing_sorts_by_reward_risk() {
        let provider = MemoryProvider::default()
            .with_flat("FLAT.NS", 450.0, 60)
            .with("UP.NS", &ramp(60));
        let scanner = Scanner::new(Arc::new(provider));
        let registry = ProfileRegistry::new();
        let symbols = tickers(&["FLAT", "UP"]);

        let swing = registry.get("swing").unwrap();
        assert_eq!(swing.sort, SortOrder::RewardRiskDesc);
        let report = scanner.run(swing, "test", &symbols).await;
        let order: Vec<_> = report.results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["UP.NS", "FLAT.NS"]);
        assert!(report.results[0].levels.is_some());
        assert!(report.results[1].levels.is_none());

        let mut unsorted = swing.clone();
        unsorted.sort = SortOrder::None;
        let report = scanner.run(&unsorted, "test", &symbols).await;
        let order: Vec<_> = report.results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["FLAT.NS", "UP.NS"]);
    }
}
