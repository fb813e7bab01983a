//! CSV data source for offline scans.
//!
//! Layout of a data directory:
//! - `{SYMBOL}.csv` or `{BASE}.csv` per ticker (Date, Open, High, Low, Close, Volume)
//! - optional `fundamentals.csv` with one row per ticker

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use screener_core::error::DataError;
use screener_core::traits::MarketDataProvider;
use screener_core::types::{Bar, FundamentalSnapshot, Ticker};

use crate::keep_last;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// `fundamentals.csv` row. Empty cells read as absent.
#[derive(Debug, Deserialize)]
struct FundamentalRecord {
    ticker: String,
    trailing_pe: Option<f64>,
    price_to_book: Option<f64>,
    debt_to_equity: Option<f64>,
    return_on_equity: Option<f64>,
    earnings_growth: Option<f64>,
}

/// CSV data source for historical data.
pub struct CsvDataSource {
    dir: PathBuf,
    fundamentals: HashMap<String, FundamentalSnapshot>,
}

impl CsvDataSource {
    /// Open a data directory, loading `fundamentals.csv` if present.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable(dir.display().to_string()));
        }

        let fundamentals_path = dir.join("fundamentals.csv");
        let fundamentals = if fundamentals_path.exists() {
            Self::load_fundamentals(&fundamentals_path)?
        } else {
            HashMap::new()
        };

        Ok(Self { dir, fundamentals })
    }

    fn load_fundamentals(path: &Path) -> Result<HashMap<String, FundamentalSnapshot>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut rows = HashMap::new();
        for result in reader.deserialize() {
            let record: FundamentalRecord =
                result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let ticker = Ticker::parse(&record.ticker)
                .map_err(|e| DataError::ParseError(e.to_string()))?;
            let snapshot = FundamentalSnapshot {
                trailing_pe: record.trailing_pe,
                price_to_book: record.price_to_book,
                debt_to_equity: record.debt_to_equity,
                return_on_equity: record.return_on_equity,
                earnings_growth: record.earnings_growth,
            };
            rows.insert(ticker.as_str().to_string(), snapshot.sanitized());
        }

        Ok(rows)
    }

    fn bars_path(&self, ticker: &Ticker) -> Option<PathBuf> {
        let base = ticker.base_symbol();
        [
            format!("{}.csv", ticker.as_str()),
            format!("{}.csv", base),
            format!("{}.csv", base.to_lowercase()),
        ]
        .into_iter()
        .map(|name| self.dir.join(name))
        .find(|path| path.exists())
    }

    /// Load every bar stored for the ticker, oldest first.
    pub fn load_all(&self, ticker: &Ticker) -> Result<Vec<Bar>, DataError> {
        let path = self
            .bars_path(ticker)
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;
        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        bars.retain(Bar::is_valid);
        bars.sort_by_key(|b| b.timestamp);

        Ok(bars)
    }
}

/// Parse various timestamp formats to Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d", "%d-%m-%Y", "%d-%b-%Y"];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl MarketDataProvider for CsvDataSource {
    /// The window ends at the newest stored bar, not at today, so saved
    /// files scan the same way whenever they are replayed.
    async fn daily_bars(&self, ticker: &Ticker, sessions: u32) -> Result<Vec<Bar>, DataError> {
        let bars = self.load_all(ticker)?;
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable(ticker.to_string()));
        }
        Ok(keep_last(bars, sessions))
    }

    async fn fundamentals(&self, ticker: &Ticker) -> Result<FundamentalSnapshot, DataError> {
        Ok(self
            .fundamentals
            .get(ticker.as_str())
            .copied()
            .unwrap_or_else(FundamentalSnapshot::empty))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
