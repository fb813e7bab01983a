//! Volume indicators.

use screener_core::traits::BarIndicator;
use screener_core::types::Bar;

use crate::simd::money_flow_volume_simd;

/// Accumulation/Distribution line.
///
/// Running total of close-location-value × volume. A rising line means
/// closes are landing near the highs on meaningful volume.
#[derive(Debug, Clone, Default)]
pub struct AccumulationDistribution;

impl AccumulationDistribution {
    pub fn new() -> Self {
        Self
    }

    /// A/D line from OHLCV columns.
    pub fn calculate_ohlcv(&self, high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
        money_flow_volume_simd(high, low, close, volume)
            .into_iter()
            .scan(0.0, |acc, mfv| {
                *acc += mfv;
                Some(*acc)
            })
            .collect()
    }

    /// True when the latest A/D value is above the value `lookback` bars earlier.
    pub fn is_rising(line: &[f64], lookback: usize) -> Option<bool> {
        if lookback == 0 || line.len() <= lookback {
            return None;
        }
        let last = line[line.len() - 1];
        let earlier = line[line.len() - 1 - lookback];
        Some(last > earlier)
    }
}

impl BarIndicator for AccumulationDistribution {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volume: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        self.calculate_ohlcv(&high, &low, &close, &volume)
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "A/D"
    }
}
