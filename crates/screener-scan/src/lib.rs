//! Scan profiles, scoring and reports.
//!
//! A scan profile is one screener variant: a lookback window, a minimum bar
//! count, a list of threshold conditions, a pass rule, and optionally trade
//! levels and a sort order. The [`Scanner`] runs a profile over a list of
//! tickers one at a time and collects a [`ScanReport`].

mod condition;
mod levels;
mod profile;
mod registry;
mod report;
mod result;
mod scanner;
mod sentiment;
mod snapshot;

pub use condition::{Category, Condition, ScanContext};
pub use levels::{LevelMethod, TradeLevels};
pub use profile::{PassRule, ScanProfile, SortOrder};
pub use registry::ProfileRegistry;
pub use report::ScanReport;
pub use result::{ScanResult, Scores, SkippedTicker};
pub use scanner::Scanner;
pub use sentiment::{LexiconScorer, SAMPLE_HEADLINES};
pub use snapshot::{ChartSeries, IndicatorSnapshot};
