//! NSE option-chain open interest.
//!
//! The NSE JSON endpoints refuse requests without the session cookies the
//! home page sets, so the client visits the home page once before the
//! first option-chain request.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use screener_core::error::DataError;
use screener_core::traits::OptionChainSource;
use screener_core::types::{OpenInterestSummary, Ticker};

/// NSE endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NseConfig {
    pub home_url: String,
    pub option_chain_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            home_url: "https://www.nseindia.com".to_string(),
            option_chain_url: "https://www.nseindia.com/api/option-chain-equities".to_string(),
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OptionChainResponse {
    #[serde(default)]
    filtered: Option<FilteredChain>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilteredChain {
    data: Vec<StrikeRow>,
    #[serde(rename = "CE")]
    calls: Option<ChainTotals>,
    #[serde(rename = "PE")]
    puts: Option<ChainTotals>,
}

#[derive(Debug, Deserialize)]
struct ChainTotals {
    #[serde(rename = "totOI")]
    tot_oi: f64,
}

#[derive(Debug, Deserialize)]
struct StrikeRow {
    #[serde(rename = "CE")]
    call: Option<ContractOi>,
    #[serde(rename = "PE")]
    put: Option<ContractOi>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractOi {
    #[serde(default)]
    open_interest: f64,
}

/// Aggregate the nearest-expiry chain, preferring NSE's own totals.
fn summarize(ticker: &Ticker, resp: OptionChainResponse) -> Result<OpenInterestSummary, DataError> {
    let chain = resp
        .filtered
        .ok_or_else(|| DataError::NoDataAvailable(format!("option chain for {ticker}")))?;

    let summary = match (&chain.calls, &chain.puts) {
        (Some(calls), Some(puts)) => OpenInterestSummary {
            call_oi: calls.tot_oi,
            put_oi: puts.tot_oi,
        },
        _ => {
            let (call_oi, put_oi) = chain.data.iter().fold((0.0, 0.0), |(c, p), row| {
                (
                    c + row.call.as_ref().map_or(0.0, |x| x.open_interest),
                    p + row.put.as_ref().map_or(0.0, |x| x.open_interest),
                )
            });
            OpenInterestSummary { call_oi, put_oi }
        }
    };

    if summary.call_oi <= 0.0 && summary.put_oi <= 0.0 {
        return Err(DataError::NoDataAvailable(format!("option chain for {ticker}")));
    }

    Ok(summary)
}

/// NSE option-chain client.
pub struct NseOptionChain {
    config: NseConfig,
    client: Client,
    session: OnceCell<()>,
}

impl NseOptionChain {
    /// Create a client with a cookie store for the NSE session.
    pub fn new(config: NseConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            config,
            client,
            session: OnceCell::new(),
        })
    }

    async fn ensure_session(&self) -> Result<(), DataError> {
        self.session
            .get_or_try_init(|| async {
                debug!(url = %self.config.home_url, "Opening NSE session");
                self.client
                    .get(&self.config.home_url)
                    .send()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;
                Ok::<(), DataError>(())
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl OptionChainSource for NseOptionChain {
    async fn open_interest(&self, ticker: &Ticker) -> Result<OpenInterestSummary, DataError> {
        self.ensure_session().await?;

        let response = self
            .client
            .get(&self.config.option_chain_url)
            .query(&[("symbol", ticker.base_symbol())])
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                source_name: "nse".to_string(),
                status: status.as_u16(),
            });
        }

        // NSE answers `{}` for symbols without listed options
        let chain: OptionChainResponse = response.json().await.map_err(|e| {
            DataError::ResponseFormatChanged(format!("option chain for {ticker}: {e}"))
        })?;

        let summary = summarize(ticker, chain)?;
        debug!(%ticker, call_oi = summary.call_oi, put_oi = summary.put_oi, "Fetched open interest");
        Ok(summary)
    }

    fn name(&self) -> &str {
        "nse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> Ticker {
        Ticker::parse("SBIN.NS").unwrap()
    }

    #[test]
    fn test_summarize_uses_totals() {
        let json = r#"{
            "records": {"expiryDates": ["28-Nov-2024"]},
            "filtered": {
                "data": [],
                "CE": {"totOI": 120000, "totVol": 5000},
                "PE": {"totOI": 150000, "totVol": 4000}
            }
        }"#;

        let resp: OptionChainResponse = serde_json::from_str(json).unwrap();
        let summary = summarize(&ticker(), resp).unwrap();

        assert_eq!(summary.call_oi, 120000.0);
        assert_eq!(summary.put_oi, 150000.0);
        assert!((summary.put_call_ratio().unwrap() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_sums_strikes_without_totals() {
        let json = r#"{
            "filtered": {
                "data": [
                    {"strikePrice": 800, "CE": {"openInterest": 100}, "PE": {"openInterest": 300}},
                    {"strikePrice": 810, "CE": {"openInterest": 200}},
                    {"strikePrice": 820, "PE": {"openInterest": 60}}
                ]
            }
        }"#;

        let resp: OptionChainResponse = serde_json::from_str(json).unwrap();
        let summary = summarize(&ticker(), resp).unwrap();

        assert_eq!(summary.call_oi, 300.0);
        assert_eq!(summary.put_oi, 360.0);
    }

    #[test]
    fn test_totals_field_name() {
        let totals: ChainTotals =
            serde_json::from_str(r#"{"totOI": 98765, "totVol": 12}"#).unwrap();
        assert_eq!(totals.tot_oi, 98765.0);

        assert!(serde_json::from_str::<ChainTotals>(r#"{"totOi": 1}"#).is_err());
    }

    #[test]
    fn test_summarize_empty_body() {
        let resp: OptionChainResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            summarize(&ticker(), resp),
            Err(DataError::NoDataAvailable(_))
        ));
    }
}
