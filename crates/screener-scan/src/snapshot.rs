//! Latest indicator values for one ticker.

use serde::{Deserialize, Serialize};

use screener_core::traits::{BarIndicator, Indicator, MultiOutputIndicator};
use screener_core::types::BarSeries;
use screener_indicators::{AccumulationDistribution, Atr, Macd, MacdOutput, RollingHigh, Rsi, Sma};

/// Bars the A/D trend looks back over.
pub const AD_TREND_LOOKBACK: usize = 5;

/// Latest indicator values reduced from a bar series.
///
/// Every derived value is optional: `None` means the series was too short
/// for that window, and any condition reading it fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub bars: usize,
    pub close: f64,
    pub volume: f64,
    /// Percent change from the first to the last close of the window
    pub window_change_pct: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdOutput>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub atr: Option<f64>,
    /// Highest high of the 20 bars before the latest one
    pub high_20: Option<f64>,
    /// Highest high of the 50 bars before the latest one
    pub high_50: Option<f64>,
    pub avg_volume_20: Option<f64>,
    pub ad_line: Option<f64>,
    pub ad_rising: Option<bool>,
}

impl IndicatorSnapshot {
    /// Compute the snapshot; `None` for an empty series.
    pub fn from_series(series: &BarSeries) -> Option<Self> {
        let last = series.last()?;
        let closes = series.closes();
        let highs = series.highs();
        let volumes = series.volumes();

        let window_change_pct = match (series.first(), series.len()) {
            (Some(first), n) if n >= 2 && first.close > 0.0 => {
                Some((last.close - first.close) / first.close * 100.0)
            }
            _ => None,
        };

        let ad = AccumulationDistribution::new().calculate_bars(series.bars());

        Some(Self {
            bars: series.len(),
            close: last.close,
            volume: last.volume,
            window_change_pct,
            rsi: Rsi::default().latest(&closes),
            macd: Macd::new().latest(&closes),
            sma_20: Sma::new(20).latest(&closes),
            sma_50: Sma::new(50).latest(&closes),
            atr: Atr::default().calculate_bars(series.bars()).pop(),
            high_20: RollingHigh::new(20).latest(&highs),
            high_50: RollingHigh::new(50).latest(&highs),
            avg_volume_20: Sma::new(20).latest(&volumes),
            ad_line: ad.last().copied(),
            ad_rising: AccumulationDistribution::is_rising(&ad, AD_TREND_LOOKBACK),
        })
    }

    /// SMA for one of the tracked windows.
    pub fn sma(&self, window: usize) -> Option<f64> {
        match window {
            20 => self.sma_20,
            50 => self.sma_50,
            _ => None,
        }
    }

    /// Prior rolling high for one of the tracked windows.
    pub fn prior_high(&self, window: usize) -> Option<f64> {
        match window {
            20 => self.high_20,
            50 => self.high_50,
            _ => None,
        }
    }
}

/// Close and moving-average lines for the dashboard chart.
///
/// Moving-average vectors are aligned to the end of `closes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub closes: Vec<f64>,
    pub sma_20: Vec<f64>,
    pub sma_50: Vec<f64>,
}

impl ChartSeries {
    pub fn from_series(series: &BarSeries) -> Self {
        let closes = series.closes();
        Self {
            sma_20: Sma::new(20).calculate(&closes),
            sma_50: Sma::new(50).calculate(&closes),
            closes,
        }
    }

    pub fn close_points(&self) -> Vec<(f64, f64)> {
        Self::points(self.closes.len(), &self.closes)
    }

    pub fn sma_20_points(&self) -> Vec<(f64, f64)> {
        Self::points(self.closes.len(), &self.sma_20)
    }

    pub fn sma_50_points(&self) -> Vec<(f64, f64)> {
        Self::points(self.closes.len(), &self.sma_50)
    }

    fn points(len: usize, values: &[f64]) -> Vec<(f64, f64)> {
        let offset = len.saturating_sub(values.len());
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ((offset + i) as f64, *v))
            .collect()
    }

    /// (min, max) over every plotted value.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.closes
            .iter()
            .chain(&self.sma_20)
            .chain(&self.sma_50)
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
