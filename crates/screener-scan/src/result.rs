//! Per-ticker scan outcomes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use screener_core::types::{FundamentalSnapshot, Ticker};

use crate::levels::TradeLevels;
use crate::snapshot::{ChartSeries, IndicatorSnapshot};

/// Passing-condition counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub technical: u32,
    pub fundamental: u32,
}

impl Scores {
    pub fn total(&self) -> u32 {
        self.technical + self.fundamental
    }
}

/// One scored ticker.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub ticker: Ticker,
    pub as_of: NaiveDate,
    pub close: f64,
    pub indicators: IndicatorSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamentals: Option<FundamentalSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_call_ratio: Option<f64>,
    pub scores: Scores,
    pub passed_conditions: Vec<String>,
    pub levels: Option<TradeLevels>,
    /// Pass rule met and, when required, reward/risk high enough
    pub passed: bool,
    #[serde(skip)]
    pub chart: ChartSeries,
}

impl ScanResult {
    pub fn reward_risk(&self) -> Option<f64> {
        self.levels.as_ref().map(TradeLevels::reward_risk_f64)
    }
}

/// A ticker the scan could not score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

impl SkippedTicker {
    pub fn new(ticker: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            ticker: ticker.into(),
            reason: reason.to_string(),
        }
    }
}
