//! Rolling high-water marks.

use screener_core::traits::Indicator;

use crate::simd::max_simd;

/// Highest value over the `window` points *before* each point.
///
/// Excluding the current point makes "close above the rolling high" a
/// breakout test rather than a tautology.
#[derive(Debug, Clone)]
pub struct RollingHigh {
    window: usize,
}

impl RollingHigh {
    /// Create a rolling high over the given window.
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "Window must be greater than 0");
        Self { window }
    }
}

impl Indicator for RollingHigh {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.window {
            return vec![];
        }

        (self.window..data.len())
            .filter_map(|i| max_simd(&data[i - self.window..i]))
            .collect()
    }

    fn period(&self) -> usize {
        self.window + 1
    }

    fn name(&self) -> &str {
        "RollingHigh"
    }

    fn latest(&self, data: &[f64]) -> Option<f64> {
        if data.len() <= self.window {
            return None;
        }
        let end = data.len() - 1;
        max_simd(&data[end - self.window..end])
    }
}
