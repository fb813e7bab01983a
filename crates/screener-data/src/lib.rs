//! Market data sources and ticker universes for the screener.
//!
//! - [`YahooProvider`]: daily bars and fundamentals over HTTP
//! - [`NseOptionChain`]: option-chain open interest
//! - [`CsvDataSource`]: offline bars and fundamentals from a directory
//! - [`UniverseBook`]: named ticker lists
//!
//! Providers take a history length in trading sessions and return at most
//! that many bars, newest last.

mod csv_source;
mod nse;
mod universe;
mod yahoo;

pub use csv_source::CsvDataSource;
pub use nse::{NseConfig, NseOptionChain};
pub use universe::UniverseBook;
pub use yahoo::{YahooConfig, YahooProvider};

use screener_core::types::Bar;

/// Calendar days that hold `sessions` trading days, with room for a
/// holiday-heavy stretch.
pub(crate) fn calendar_span(sessions: u32) -> i64 {
    i64::from(sessions) * 7 / 5 + 10
}

/// Keep the newest `sessions` bars of an oldest-first vector.
pub(crate) fn keep_last(mut bars: Vec<Bar>, sessions: u32) -> Vec<Bar> {
    let keep = sessions as usize;
    if bars.len() > keep {
        bars.drain(..bars.len() - keep);
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_span_covers_holiday_week() {
        // eight sessions across a weekend plus two holidays need 12 days
        assert!(calendar_span(8) >= 12);
        assert!(calendar_span(90) >= 126);
    }

    #[test]
    fn test_keep_last() {
        let bars: Vec<Bar> = (0..10)
            .map(|i| Bar::new(i, 100.0, 101.0, 99.0, 100.0 + i as f64, 1_000.0))
            .collect();

        let kept = keep_last(bars.clone(), 8);
        assert_eq!(kept.len(), 8);
        assert_eq!(kept[0].timestamp, 2);
        assert_eq!(kept[7].timestamp, 9);

        assert_eq!(keep_last(bars, 20).len(), 10);
    }
}
