//! Yahoo Finance market data provider.
//!
//! Daily bars come from the v8 chart API; fundamentals from the v10
//! quoteSummary API. Yahoo has no official API contract, so every parse
//! failure surfaces as [`DataError::ResponseFormatChanged`] and the scan
//! skips the ticker.
//!
//! quoteSummary rejects requests without a session cookie and a matching
//! crumb. The provider collects both once, before its first fundamentals
//! request.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use screener_core::error::DataError;
use screener_core::traits::MarketDataProvider;
use screener_core::types::{Bar, FundamentalSnapshot, Ticker};

use crate::{calendar_span, keep_last};

const QUOTE_MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData";

/// Yahoo endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub chart_url: String,
    pub quote_summary_url: String,
    /// Visited once to receive the session cookie
    pub cookie_url: String,
    pub crumb_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query2.finance.yahoo.com/v8/finance/chart".to_string(),
            quote_summary_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary"
                .to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query2.finance.yahoo.com/v1/test/getcrumb".to_string(),
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
        }
    }
}

// Chart API response types

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

// quoteSummary API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuoteSummaryModules {
    summary_detail: SummaryDetail,
    default_key_statistics: KeyStatistics,
    financial_data: FinancialData,
}

/// Yahoo wraps numbers as `{"raw": 12.3, "fmt": "12.30"}`, or `{}` when absent.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct KeyStatistics {
    price_to_book: RawValue,
    earnings_quarterly_growth: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FinancialData {
    debt_to_equity: RawValue,
    return_on_equity: RawValue,
    earnings_growth: RawValue,
}

/// Yahoo Finance client.
pub struct YahooProvider {
    config: YahooConfig,
    client: Client,
    crumb: OnceCell<String>,
}

impl YahooProvider {
    /// Create a provider with its own HTTP client and cookie store.
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            config,
            client,
            crumb: OnceCell::new(),
        })
    }

    /// Request window wide enough to hold `sessions` trading days.
    fn chart_url(&self, ticker: &Ticker, sessions: u32) -> String {
        let end = Utc::now();
        let start = end - ChronoDuration::days(calendar_span(sessions));
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history",
            self.config.chart_url,
            ticker,
            start.timestamp(),
            end.timestamp()
        )
    }

    fn quote_summary_url(&self, ticker: &Ticker, crumb: &str) -> Result<Url, DataError> {
        let base = format!("{}/{}", self.config.quote_summary_url, ticker);
        Url::parse_with_params(&base, &[("modules", QUOTE_MODULES), ("crumb", crumb)])
            .map_err(|e| DataError::ConnectionError(format!("invalid url {base}: {e}")))
    }

    async fn crumb(&self) -> Result<&str, DataError> {
        self.crumb
            .get_or_try_init(|| async {
                debug!(url = %self.config.cookie_url, "Opening Yahoo session");
                // the cookie host answers 404 but still sets the cookie
                self.client
                    .get(&self.config.cookie_url)
                    .send()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;

                let response = self
                    .client
                    .get(&self.config.crumb_url)
                    .send()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::HttpStatus {
                        source_name: "yahoo".to_string(),
                        status: status.as_u16(),
                    });
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;
                parse_crumb(&body)
            })
            .await
            .map(String::as_str)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        ticker: &Ticker,
        url: &str,
    ) -> Result<T, DataError> {
        debug!(%ticker, url, "Yahoo request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(ticker.to_string()));
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                source_name: "yahoo".to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })
    }
}

/// A crumb is a short opaque token; anything else means the session failed.
fn parse_crumb(body: &str) -> Result<String, DataError> {
    let crumb = body.trim();
    let malformed = crumb.chars().any(|c| c.is_whitespace() || c == '<');
    if crumb.is_empty() || crumb.len() > 64 || malformed {
        return Err(DataError::ResponseFormatChanged(
            "Yahoo did not return a crumb".to_string(),
        ));
    }
    Ok(crumb.to_string())
}

/// Turn a chart response into bars, skipping holiday rows with no close.
fn parse_chart(ticker: &Ticker, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound(ticker.to_string()),
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    // A valid symbol with no trading in the window has no timestamps at all.
    let timestamps = data
        .timestamp
        .ok_or_else(|| DataError::NoDataAvailable(ticker.to_string()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let bars: Vec<Bar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = quote.close.get(i).copied().flatten()?;
            let open = quote.open.get(i).copied().flatten().unwrap_or(close);
            let high = quote.high.get(i).copied().flatten().unwrap_or(close);
            let low = quote.low.get(i).copied().flatten().unwrap_or(close);
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
            Some(Bar::new(ts * 1000, open, high, low, close, volume as f64))
        })
        .filter(Bar::is_valid)
        .collect();

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable(ticker.to_string()));
    }

    Ok(bars)
}

/// Pull the screener's ratios out of a quoteSummary response.
fn parse_quote_summary(
    ticker: &Ticker,
    resp: QuoteSummaryResponse,
) -> Result<FundamentalSnapshot, DataError> {
    let modules = resp
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| match resp.quote_summary.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound(ticker.to_string()),
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::NoDataAvailable(ticker.to_string()),
        })?;

    let financial = &modules.financial_data;
    let stats = &modules.default_key_statistics;

    Ok(FundamentalSnapshot {
        trailing_pe: modules.summary_detail.trailing_pe.raw,
        price_to_book: stats.price_to_book.raw,
        // Yahoo reports debt/equity in percent
        debt_to_equity: financial.debt_to_equity.raw.map(|pct| pct / 100.0),
        return_on_equity: financial.return_on_equity.raw,
        earnings_growth: stats
            .earnings_quarterly_growth
            .raw
            .or(financial.earnings_growth.raw),
    }
    .sanitized())
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn daily_bars(&self, ticker: &Ticker, sessions: u32) -> Result<Vec<Bar>, DataError> {
        let url = self.chart_url(ticker, sessions);
        let chart: ChartResponse = self.get_json(ticker, &url).await?;
        let bars = keep_last(parse_chart(ticker, chart)?, sessions);
        debug!(%ticker, bars = bars.len(), "Fetched daily bars");
        Ok(bars)
    }

    async fn fundamentals(&self, ticker: &Ticker) -> Result<FundamentalSnapshot, DataError> {
        let crumb = self.crumb().await?;
        let url = self.quote_summary_url(ticker, crumb)?;
        let summary: QuoteSummaryResponse = self.get_json(ticker, url.as_str()).await?;
        parse_quote_summary(ticker, summary)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> Ticker {
        Ticker::parse("RELIANCE").unwrap()
    }

    #[test]
    fn test_parse_chart_skips_holidays() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {
                        "quote": [{
                            "open":   [2500.0, null, 2520.0],
                            "high":   [2550.0, null, 2560.0],
                            "low":    [2490.0, null, 2510.0],
                            "close":  [2540.0, null, 2555.5],
                            "volume": [1200000, null, 900000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = parse_chart(&ticker(), resp).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1704067200000);
        assert_eq!(bars[1].close, 2555.5);
        assert_eq!(bars[1].volume, 900000.0);
    }

    #[test]
    fn test_parse_chart_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = parse_chart(&ticker(), resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let json = r#"{
            "chart": {
                "result": [{"indicators": {"quote": [{}]}}],
                "error": null
            }
        }"#;

        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = parse_chart(&ticker(), resp).unwrap_err();
        assert!(matches!(err, DataError::NoDataAvailable(_)));
    }

    #[test]
    fn test_parse_quote_summary() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {"trailingPE": {"raw": 24.6, "fmt": "24.60"}},
                    "defaultKeyStatistics": {
                        "priceToBook": {"raw": 2.1, "fmt": "2.10"},
                        "earningsQuarterlyGrowth": {}
                    },
                    "financialData": {
                        "debtToEquity": {"raw": 36.5, "fmt": "36.50"},
                        "returnOnEquity": {"raw": 0.18, "fmt": "18.00%"},
                        "earningsGrowth": {"raw": 0.07, "fmt": "7.00%"}
                    }
                }],
                "error": null
            }
        }"#;

        let resp: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let snapshot = parse_quote_summary(&ticker(), resp).unwrap();

        assert_eq!(snapshot.trailing_pe, Some(24.6));
        assert_eq!(snapshot.price_to_book, Some(2.1));
        assert!((snapshot.debt_to_equity.unwrap() - 0.365).abs() < 1e-12);
        assert_eq!(snapshot.return_on_equity, Some(0.18));
        // falls back to financialData when the quarterly figure is missing
        assert_eq!(snapshot.earnings_growth, Some(0.07));
    }

    #[test]
    fn test_parse_quote_summary_missing_modules() {
        let json = r#"{"quoteSummary": {"result": [{"summaryDetail": {}}], "error": null}}"#;

        let resp: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let snapshot = parse_quote_summary(&ticker(), resp).unwrap();
        assert_eq!(snapshot, FundamentalSnapshot::empty());
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_chart_url_covers_sessions() {
        let provider = YahooProvider::new(YahooConfig::default()).unwrap();
        let url = Url::parse(&provider.chart_url(&ticker(), 8)).unwrap();

        assert!(url
            .as_str()
            .starts_with("https://query2.finance.yahoo.com/v8/finance/chart/RELIANCE.NS?"));
        assert_eq!(query_value(&url, "interval").as_deref(), Some("1d"));

        let start: i64 = query_value(&url, "period1").unwrap().parse().unwrap();
        let end: i64 = query_value(&url, "period2").unwrap().parse().unwrap();
        // a holiday week still leaves eight sessions inside the window
        assert!(end - start >= 14 * 86_400);
        assert_eq!(end - start, calendar_span(8) * 86_400);
    }

    #[test]
    fn test_quote_summary_url_carries_crumb() {
        let provider = YahooProvider::new(YahooConfig::default()).unwrap();
        let url = provider.quote_summary_url(&ticker(), "aB1/x.Yz").unwrap();

        assert_eq!(url.path(), "/v10/finance/quoteSummary/RELIANCE.NS");
        assert_eq!(query_value(&url, "crumb").as_deref(), Some("aB1/x.Yz"));
        assert_eq!(query_value(&url, "modules").as_deref(), Some(QUOTE_MODULES));
        assert!(url.as_str().contains("crumb=aB1%2Fx.Yz"));
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("aB1/x.Yz\n").unwrap(), "aB1/x.Yz");
        assert!(parse_crumb("").is_err());
        assert!(parse_crumb("<html><body>Too Many Requests</body></html>").is_err());
    }
}
