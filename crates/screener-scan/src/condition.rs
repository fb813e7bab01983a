//! Threshold conditions.
//!
//! Each condition compares one current value to a constant. A value that is
//! undefined (short history, absent fundamental, no option chain) fails.

use serde::{Deserialize, Serialize};
use std::fmt;

use screener_core::types::FundamentalSnapshot;

use crate::snapshot::{IndicatorSnapshot, AD_TREND_LOOKBACK};

/// Which score a passing condition counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Fundamental,
}

/// Everything a condition may read for one ticker.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub indicators: &'a IndicatorSnapshot,
    pub fundamentals: Option<&'a FundamentalSnapshot>,
    pub put_call_ratio: Option<f64>,
    pub sentiment: Option<f64>,
}

impl<'a> ScanContext<'a> {
    pub fn technical(indicators: &'a IndicatorSnapshot) -> Self {
        Self {
            indicators,
            fundamentals: None,
            put_call_ratio: None,
            sentiment: None,
        }
    }

    fn fundamental(&self, pick: impl Fn(&FundamentalSnapshot) -> Option<f64>) -> Option<f64> {
        self.fundamentals.and_then(pick).filter(|v| v.is_finite())
    }
}

/// A boolean predicate over a [`ScanContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// RSI strictly below `max`
    RsiBelow { max: f64 },
    /// RSI within `[min, max]`
    RsiBetween { min: f64, max: f64 },
    MacdAboveSignal,
    /// SMA-20 above SMA-50
    SmaFastAboveSlow,
    CloseAboveSma { window: usize },
    /// Close above the highest high of the prior `window` bars
    Breakout { window: usize },
    /// Latest volume above `multiple` × 20-day average volume
    VolumeSpike { multiple: f64 },
    AccumulationRising,
    WindowGainAtLeast { pct: f64 },
    PeBelow { max: f64 },
    PbBelow { max: f64 },
    DebtToEquityBelow { max: f64 },
    RoeAbove { min: f64 },
    EarningsGrowthAbove { min: f64 },
    PutCallRatioAbove { min: f64 },
    SentimentAtLeast { min: f64 },
}

impl Condition {
    /// Evaluate against one ticker's context.
    pub fn evaluate(&self, ctx: &ScanContext<'_>) -> bool {
        let ind = ctx.indicators;
        let result = match self {
            Condition::RsiBelow { max } => ind.rsi.map(|rsi| rsi < *max),
            Condition::RsiBetween { min, max } => ind.rsi.map(|rsi| rsi >= *min && rsi <= *max),
            Condition::MacdAboveSignal => ind.macd.map(|m| m.is_bullish()),
            Condition::SmaFastAboveSlow => ind.sma_20.zip(ind.sma_50).map(|(fast, slow)| fast > slow),
            Condition::CloseAboveSma { window } => ind.sma(*window).map(|sma| ind.close > sma),
            Condition::Breakout { window } => ind.prior_high(*window).map(|high| ind.close > high),
            Condition::VolumeSpike { multiple } => ind
                .avg_volume_20
                .filter(|avg| *avg > 0.0)
                .map(|avg| ind.volume > multiple * avg),
            Condition::AccumulationRising => ind.ad_rising,
            Condition::WindowGainAtLeast { pct } => ind.window_change_pct.map(|chg| chg >= *pct),
            Condition::PeBelow { max } => ctx.fundamental(|f| f.trailing_pe).map(|v| v < *max),
            Condition::PbBelow { max } => ctx.fundamental(|f| f.price_to_book).map(|v| v < *max),
            Condition::DebtToEquityBelow { max } => {
                ctx.fundamental(|f| f.debt_to_equity).map(|v| v < *max)
            }
            Condition::RoeAbove { min } => ctx.fundamental(|f| f.return_on_equity).map(|v| v > *min),
            Condition::EarningsGrowthAbove { min } => {
                ctx.fundamental(|f| f.earnings_growth).map(|v| v > *min)
            }
            Condition::PutCallRatioAbove { min } => ctx.put_call_ratio.map(|pcr| pcr > *min),
            Condition::SentimentAtLeast { min } => ctx.sentiment.map(|s| s >= *min),
        };
        result.unwrap_or(false)
    }

    /// Derivatives and sentiment conditions count as technical.
    pub fn category(&self) -> Category {
        match self {
            Condition::PeBelow { .. }
            | Condition::PbBelow { .. }
            | Condition::DebtToEquityBelow { .. }
            | Condition::RoeAbove { .. }
            | Condition::EarningsGrowthAbove { .. } => Category::Fundamental,
            _ => Category::Technical,
        }
    }

    pub fn needs_option_chain(&self) -> bool {
        matches!(self, Condition::PutCallRatioAbove { .. })
    }

    pub fn needs_sentiment(&self) -> bool {
        matches!(self, Condition::SentimentAtLeast { .. })
    }

    /// Bars needed before the condition can ever pass.
    pub fn required_bars(&self) -> usize {
        match self {
            Condition::RsiBelow { .. } | Condition::RsiBetween { .. } => 15,
            Condition::MacdAboveSignal => 34,
            Condition::SmaFastAboveSlow => 50,
            Condition::CloseAboveSma { window } => *window,
            Condition::Breakout { window } => window + 1,
            Condition::VolumeSpike { .. } => 20,
            Condition::AccumulationRising => AD_TREND_LOOKBACK + 1,
            Condition::WindowGainAtLeast { .. } => 2,
            _ => 0,
        }
    }

    /// Reject windows the snapshot does not track and nonsensical bounds.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Condition::CloseAboveSma { window } | Condition::Breakout { window }
                if !matches!(*window, 20 | 50) =>
            {
                Err(format!("{self}: window must be 20 or 50"))
            }
            Condition::RsiBetween { min, max } if min > max => {
                Err(format!("{self}: min is above max"))
            }
            Condition::VolumeSpike { multiple } if *multiple <= 0.0 => {
                Err(format!("{self}: multiple must be positive"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::RsiBelow { max } => write!(f, "RSI<{max}"),
            Condition::RsiBetween { min, max } => write!(f, "RSI {min}-{max}"),
            Condition::MacdAboveSignal => write!(f, "MACD>Signal"),
            Condition::SmaFastAboveSlow => write!(f, "SMA20>SMA50"),
            Condition::CloseAboveSma { window } => write!(f, "Close>SMA{window}"),
            Condition::Breakout { window } => write!(f, "Breakout{window}"),
            Condition::VolumeSpike { multiple } => write!(f, "Vol>{multiple}xAvg"),
            Condition::AccumulationRising => write!(f, "A/D rising"),
            Condition::WindowGainAtLeast { pct } => write!(f, "Gain>={pct}%"),
            Condition::PeBelow { max } => write!(f, "P/E<{max}"),
            Condition::PbBelow { max } => write!(f, "P/B<{max}"),
            Condition::DebtToEquityBelow { max } => write!(f, "D/E<{max}"),
            Condition::RoeAbove { min } => write!(f, "ROE>{min}"),
            Condition::EarningsGrowthAbove { min } => write!(f, "EPS growth>{min}"),
            Condition::PutCallRatioAbove { min } => write!(f, "PCR>{min}"),
            Condition::SentimentAtLeast { min } => write!(f, "Sentiment>={min}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use screener_indicators::MacdOutput;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            bars: 60,
            close: 110.0,
            volume: 3000.0,
            rsi: Some(25.0),
            macd: Some(MacdOutput {
                macd: 1.2,
                signal: 0.8,
                histogram: 0.4,
            }),
            sma_20: Some(105.0),
            sma_50: Some(100.0),
            high_20: Some(108.0),
            avg_volume_20: Some(1000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_technical_conditions() {
        let snap = snapshot();
        let ctx = ScanContext::technical(&snap);

        assert!(Condition::RsiBelow { max: 30.0 }.evaluate(&ctx));
        assert!(!Condition::RsiBetween { min: 40.0, max: 70.0 }.evaluate(&ctx));
        assert!(Condition::MacdAboveSignal.evaluate(&ctx));
        assert!(Condition::SmaFastAboveSlow.evaluate(&ctx));
        assert!(Condition::CloseAboveSma { window: 20 }.evaluate(&ctx));
        assert!(Condition::Breakout { window: 20 }.evaluate(&ctx));
        assert!(Condition::VolumeSpike { multiple: 2.0 }.evaluate(&ctx));
        assert!(!Condition::VolumeSpike { multiple: 3.0 }.evaluate(&ctx));
    }

    #[test]
    fn test_undefined_values_fail() {
        let snap = IndicatorSnapshot {
            bars: 10,
            close: 100.0,
            ..Default::default()
        };
        let ctx = ScanContext::technical(&snap);

        assert!(!Condition::RsiBelow { max: 100.0 }.evaluate(&ctx));
        assert!(!Condition::SmaFastAboveSlow.evaluate(&ctx));
        assert!(!Condition::Breakout { window: 50 }.evaluate(&ctx));
        assert!(!Condition::AccumulationRising.evaluate(&ctx));
        assert!(!Condition::PeBelow { max: 1000.0 }.evaluate(&ctx));
        assert!(!Condition::PutCallRatioAbove { min: 0.0 }.evaluate(&ctx));
        assert!(!Condition::SentimentAtLeast { min: -1.0 }.evaluate(&ctx));
    }

    #[test]
    fn test_zero_fundamental_is_present() {
        let snap = snapshot();
        let fundamentals = FundamentalSnapshot {
            trailing_pe: Some(0.0),
            debt_to_equity: Some(f64::NAN),
            ..FundamentalSnapshot::empty()
        };
        let ctx = ScanContext {
            fundamentals: Some(&fundamentals),
            ..ScanContext::technical(&snap)
        };

        assert!(Condition::PeBelow { max: 25.0 }.evaluate(&ctx));
        assert!(!Condition::DebtToEquityBelow { max: 1.0 }.evaluate(&ctx));
    }

    #[test]
    fn test_categories() {
        assert_eq!(Condition::RoeAbove { min: 0.15 }.category(), Category::Fundamental);
        assert_eq!(Condition::PutCallRatioAbove { min: 1.0 }.category(), Category::Technical);
        assert_eq!(Condition::SentimentAtLeast { min: 0.05 }.category(), Category::Technical);
    }

    #[test]
    fn test_validate_window() {
        assert!(Condition::CloseAboveSma { window: 20 }.validate().is_ok());
        assert!(Condition::Breakout { window: 30 }.validate().is_err());
        assert!(Condition::RsiBetween { min: 70.0, max: 40.0 }.validate().is_err());
    }

    #[test]
    fn test_serde_tagged() {
        let cond: Condition = serde_json::from_str(r#"{"kind":"rsi_below","max":30.0}"#).unwrap();
        assert_eq!(cond, Condition::RsiBelow { max: 30.0 });

        let cond: Condition = serde_json::from_str(r#"{"kind":"macd_above_signal"}"#).unwrap();
        assert_eq!(cond, Condition::MacdAboveSignal);
    }

    proptest! {
        #[test]
        fn prop_raising_min_threshold_never_adds_passes(
            value in -100.0f64..100.0,
            low in -100.0f64..100.0,
            bump in 0.0f64..50.0,
        ) {
            let high = low + bump;
            let fundamentals = FundamentalSnapshot {
                return_on_equity: Some(value),
                earnings_growth: Some(value),
                ..FundamentalSnapshot::empty()
            };
            let snap = IndicatorSnapshot {
                bars: 60,
                close: 100.0,
                window_change_pct: Some(value),
                ..Default::default()
            };
            let ctx = ScanContext {
                fundamentals: Some(&fundamentals),
                put_call_ratio: Some(value),
                sentiment: Some(value),
                ..ScanContext::technical(&snap)
            };

            let pairs = [
                (Condition::RoeAbove { min: low }, Condition::RoeAbove { min: high }),
                (Condition::EarningsGrowthAbove { min: low }, Condition::EarningsGrowthAbove { min: high }),
                (Condition::PutCallRatioAbove { min: low }, Condition::PutCallRatioAbove { min: high }),
                (Condition::SentimentAtLeast { min: low }, Condition::SentimentAtLeast { min: high }),
                (Condition::WindowGainAtLeast { pct: low }, Condition::WindowGainAtLeast { pct: high }),
            ];
            for (loose, strict) in pairs {
                prop_assert!(!strict.evaluate(&ctx) || loose.evaluate(&ctx));
            }
        }

        #[test]
        fn prop_raising_volume_multiple_never_adds_passes(
            volume in 0.0f64..1e7,
            avg in 1.0f64..1e7,
            low in 0.1f64..5.0,
            bump in 0.0f64..5.0,
        ) {
            let snap = IndicatorSnapshot {
                bars: 60,
                close: 100.0,
                volume,
                avg_volume_20: Some(avg),
                ..Default::default()
            };
            let ctx = ScanContext::technical(&snap);
            let loose = Condition::VolumeSpike { multiple: low };
            let strict = Condition::VolumeSpike { multiple: low + bump };
            prop_assert!(!strict.evaluate(&ctx) || loose.evaluate(&ctx));
        }
    }
}
