//! Ticker symbols with a market-suffix convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScanError;

/// Suffix appended to bare symbols (National Stock Exchange of India).
pub const DEFAULT_MARKET_SUFFIX: &str = "NS";

/// A tradable instrument identified by `SYMBOL.SUFFIX`, e.g. `RELIANCE.NS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize user input: trim, upper-case, append `.NS` to bare symbols.
    pub fn parse(input: &str) -> Result<Self, ScanError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(ScanError::InvalidTicker(input.to_string()));
        }
        if symbol.starts_with('.') || symbol.ends_with('.') {
            return Err(ScanError::InvalidTicker(input.to_string()));
        }
        if symbol.contains('.') || symbol.starts_with('^') {
            Ok(Self(symbol))
        } else {
            Ok(Self(format!("{symbol}.{DEFAULT_MARKET_SUFFIX}")))
        }
    }

    /// Full provider symbol, e.g. `RELIANCE.NS`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol without the market suffix, e.g. `RELIANCE`.
    pub fn base_symbol(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_symbol_gets_suffix() {
        let ticker = Ticker::parse("  infy ").unwrap();
        assert_eq!(ticker.as_str(), "INFY.NS");
        assert_eq!(ticker.base_symbol(), "INFY");
    }

    #[test]
    fn test_existing_suffix_kept() {
        let ticker = Ticker::parse("tatamotors.bo").unwrap();
        assert_eq!(ticker.as_str(), "TATAMOTORS.BO");
        assert_eq!(ticker.base_symbol(), "TATAMOTORS");
    }

    #[test]
    fn test_index_symbol_untouched() {
        let ticker = Ticker::parse("^nsei").unwrap();
        assert_eq!(ticker.as_str(), "^NSEI");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("HDFC BANK").is_err());
        assert!(Ticker::parse("SBIN.").is_err());
    }
}
