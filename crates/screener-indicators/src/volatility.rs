//! Volatility indicators.

use screener_core::traits::BarIndicator;
use screener_core::types::Bar;

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Wilder's smoothing seeded with the SMA of the first `period` true ranges.
    fn smooth(&self, tr: &[f64]) -> Vec<f64> {
        if tr.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let mut result = Vec::with_capacity(tr.len() - self.period + 1);

        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / period_f64;
        result.push(atr);

        for &tr_val in &tr[self.period..] {
            atr = (atr * (period_f64 - 1.0) + tr_val) / period_f64;
            result.push(atr);
        }

        result
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(14)
    }
}

impl BarIndicator for Atr {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period + 1 {
            return vec![];
        }

        let tr: Vec<f64> = bars
            .windows(2)
            .map(|w| w[1].true_range(Some(w[0].close)))
            .collect();

        self.smooth(&tr)
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ATR"
    }
}
