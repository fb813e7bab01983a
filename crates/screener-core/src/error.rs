//! Error types for the screener.

use thiserror::Error;

/// Top-level screener error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Market data provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("HTTP {status} from {source_name}")]
    HttpStatus { source_name: String, status: u16 },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not supported by {0}")]
    Unsupported(String),
}

/// Errors raised while evaluating a scan profile.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Universe not found: {0}")]
    UniverseNotFound(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),
}

/// Result type alias for screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;
