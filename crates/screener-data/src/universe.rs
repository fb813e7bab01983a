//! Named ticker universes.
//!
//! The built-in lists are hand-curated; configuration can add more or
//! replace a built-in list by reusing its name.

use std::collections::BTreeMap;

use screener_core::error::ScanError;
use screener_core::types::Ticker;

const NIFTY_50: &[&str] = &[
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK", "BAJAJ-AUTO", "BAJFINANCE",
    "BAJAJFINSV", "BEL", "BHARTIARTL", "CIPLA", "COALINDIA", "DRREDDY", "EICHERMOT", "GRASIM",
    "HCLTECH", "HDFCBANK", "HDFCLIFE", "HEROMOTOCO", "HINDALCO", "HINDUNILVR", "ICICIBANK",
    "INDUSINDBK", "INFY", "ITC", "JIOFIN", "JSWSTEEL", "KOTAKBANK", "LT", "M&M", "MARUTI",
    "NESTLEIND", "NTPC", "ONGC", "POWERGRID", "RELIANCE", "SBILIFE", "SBIN", "SHRIRAMFIN",
    "SUNPHARMA", "TATACONSUM", "TATAMOTORS", "TATASTEEL", "TCS", "TECHM", "TITAN", "TRENT",
    "ULTRACEMCO", "WIPRO", "BRITANNIA",
];

/// Sample of the Nifty 200 used by the weekly-gainer scan.
const NIFTY_200_SAMPLE: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "ICICIBANK", "INFY", "HINDUNILVR", "KOTAKBANK", "SBIN", "ITC",
    "BHARTIARTL",
];

const BANK_NIFTY: &[&str] = &[
    "HDFCBANK", "ICICIBANK", "SBIN", "KOTAKBANK", "AXISBANK", "INDUSINDBK", "BANKBARODA", "PNB",
    "AUBANK", "FEDERALBNK", "IDFCFIRSTB", "CANBK",
];

/// Registry of named universes.
#[derive(Debug, Clone, Default)]
pub struct UniverseBook {
    universes: BTreeMap<String, Vec<Ticker>>,
}

impl UniverseBook {
    /// Book holding only the built-in universes.
    pub fn builtin() -> Self {
        let mut book = Self::default();
        book.insert_symbols("nifty50", NIFTY_50);
        book.insert_symbols("nifty200", NIFTY_200_SAMPLE);
        book.insert_symbols("banknifty", BANK_NIFTY);
        book
    }

    fn insert_symbols(&mut self, name: &str, symbols: &[&str]) {
        let tickers = symbols.iter().filter_map(|s| Ticker::parse(s).ok()).collect();
        self.universes.insert(name.to_string(), tickers);
    }

    /// Add or replace a universe. Duplicate tickers keep their first position.
    pub fn insert(&mut self, name: &str, symbols: &[String]) -> Result<(), ScanError> {
        let mut tickers: Vec<Ticker> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let ticker = Ticker::parse(symbol)?;
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
        self.universes.insert(name.to_lowercase(), tickers);
        Ok(())
    }

    /// Tickers of a universe; names are case-insensitive.
    pub fn get(&self, name: &str) -> Result<&[Ticker], ScanError> {
        self.universes
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| ScanError::UniverseNotFound(name.to_string()))
    }

    /// Universe names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.universes.keys().map(String::as_str).collect()
    }

    /// (name, ticker count) pairs in sorted order.
    pub fn summary(&self) -> Vec<(&str, usize)> {
        self.universes
            .iter()
            .map(|(name, tickers)| (name.as_str(), tickers.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_universes() {
        let book = UniverseBook::builtin();

        assert_eq!(book.names(), vec!["banknifty", "nifty200", "nifty50"]);
        assert_eq!(book.get("nifty50").unwrap().len(), 50);
        assert_eq!(book.get("NIFTY200").unwrap().len(), 10);
        assert_eq!(book.get("nifty200").unwrap()[0].as_str(), "RELIANCE.NS");
    }

    #[test]
    fn test_insert_custom_universe() {
        let mut book = UniverseBook::builtin();
        book.insert(
            "Watchlist",
            &["irctc".to_string(), "IRCTC.NS".to_string(), "zomato".to_string()],
        )
        .unwrap();

        let tickers = book.get("watchlist").unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[1].as_str(), "ZOMATO.NS");
    }

    #[test]
    fn test_unknown_universe() {
        let book = UniverseBook::builtin();
        assert!(matches!(
            book.get("sensex"),
            Err(ScanError::UniverseNotFound(_))
        ));
    }

    #[test]
    fn test_insert_rejects_bad_symbol() {
        let mut book = UniverseBook::default();
        assert!(book.insert("bad", &["TWO WORDS".to_string()]).is_err());
    }
}
