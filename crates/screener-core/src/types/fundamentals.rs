//! Fundamental ratios and derivatives open-interest snapshots.

use serde::{Deserialize, Serialize};

/// Point-in-time fundamental ratios for one ticker.
///
/// Every field is optional; an absent value makes any condition on it fail.
/// Zero is a real value, not a missing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    /// Trailing twelve-month price/earnings
    pub trailing_pe: Option<f64>,
    /// Price/book
    pub price_to_book: Option<f64>,
    /// Debt/equity as a plain ratio (0.5 = 50%)
    pub debt_to_equity: Option<f64>,
    /// Return on equity as a fraction (0.18 = 18%)
    pub return_on_equity: Option<f64>,
    /// Quarter-over-quarter earnings growth as a fraction
    pub earnings_growth: Option<f64>,
}

impl FundamentalSnapshot {
    /// Snapshot with no fields populated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drop non-finite values so they read as absent.
    pub fn sanitized(self) -> Self {
        let keep = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            trailing_pe: keep(self.trailing_pe),
            price_to_book: keep(self.price_to_book),
            debt_to_equity: keep(self.debt_to_equity),
            return_on_equity: keep(self.return_on_equity),
            earnings_growth: keep(self.earnings_growth),
        }
    }

    /// Number of populated fields.
    pub fn populated(&self) -> usize {
        [
            self.trailing_pe,
            self.price_to_book,
            self.debt_to_equity,
            self.return_on_equity,
            self.earnings_growth,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Aggregate open interest across one option chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestSummary {
    /// Total call open interest
    pub call_oi: f64,
    /// Total put open interest
    pub put_oi: f64,
}

impl OpenInterestSummary {
    /// Put/call open-interest ratio; undefined when there is no call OI.
    pub fn put_call_ratio(&self) -> Option<f64> {
        if self.call_oi > 0.0 {
            Some(self.put_oi / self.call_oi)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_a_value() {
        let snapshot = FundamentalSnapshot {
            trailing_pe: Some(0.0),
            ..Default::default()
        }
        .sanitized();

        assert_eq!(snapshot.trailing_pe, Some(0.0));
        assert_eq!(snapshot.populated(), 1);
    }

    #[test]
    fn test_nan_is_absent() {
        let snapshot = FundamentalSnapshot {
            price_to_book: Some(f64::NAN),
            return_on_equity: Some(0.2),
            ..Default::default()
        }
        .sanitized();

        assert!(snapshot.price_to_book.is_none());
        assert_eq!(snapshot.populated(), 1);
    }

    #[test]
    fn test_put_call_ratio() {
        let oi = OpenInterestSummary {
            call_oi: 200_000.0,
            put_oi: 260_000.0,
        };
        assert!((oi.put_call_ratio().unwrap() - 1.3).abs() < 1e-12);

        let empty = OpenInterestSummary {
            call_oi: 0.0,
            put_oi: 10.0,
        };
        assert!(empty.put_call_ratio().is_none());
    }
}
