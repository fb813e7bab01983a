//! Buy, stop-loss and target levels.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// How trade levels are derived from the latest close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LevelMethod {
    /// Fixed percentages below and above the close
    FixedPercent { stop_pct: f64, target_pct: f64 },
    /// Stop at `stop_multiple` × ATR below the close, target at
    /// `reward_multiple` × that risk above it
    Atr {
        #[serde(default = "default_stop_multiple")]
        stop_multiple: f64,
        #[serde(default = "default_reward_multiple")]
        reward_multiple: f64,
    },
}

fn default_stop_multiple() -> f64 {
    1.0
}

fn default_reward_multiple() -> f64 {
    3.0
}

impl Default for LevelMethod {
    fn default() -> Self {
        LevelMethod::Atr {
            stop_multiple: default_stop_multiple(),
            reward_multiple: default_reward_multiple(),
        }
    }
}

/// Trade levels, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub buy: Decimal,
    pub stop_loss: Decimal,
    pub target: Decimal,
    pub reward_risk: Decimal,
}

impl LevelMethod {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            LevelMethod::FixedPercent { stop_pct, target_pct } => {
                if !(*stop_pct > 0.0 && *stop_pct < 100.0) {
                    return Err(format!("stop_pct must be in (0, 100), got {stop_pct}"));
                }
                if *target_pct <= 0.0 {
                    return Err(format!("target_pct must be positive, got {target_pct}"));
                }
            }
            LevelMethod::Atr {
                stop_multiple,
                reward_multiple,
            } => {
                if *stop_multiple <= 0.0 || *reward_multiple <= 0.0 {
                    return Err("ATR multiples must be positive".to_string());
                }
            }
        }
        Ok(())
    }

    /// Derive levels from the latest close.
    ///
    /// Returns `None` unless `0 < stop < buy < target` holds after
    /// rounding; an ATR method without a positive ATR never yields levels.
    pub fn derive(&self, close: f64, atr: Option<f64>) -> Option<TradeLevels> {
        if !close.is_finite() || close <= 0.0 {
            return None;
        }

        let (stop, target) = match self {
            LevelMethod::FixedPercent { stop_pct, target_pct } => (
                close * (1.0 - stop_pct / 100.0),
                close * (1.0 + target_pct / 100.0),
            ),
            LevelMethod::Atr {
                stop_multiple,
                reward_multiple,
            } => {
                let atr = atr.filter(|a| a.is_finite() && *a > 0.0)?;
                let stop = close - stop_multiple * atr;
                let risk = close - stop;
                (stop, close + reward_multiple * risk)
            }
        };

        let buy = to_price(close)?;
        let stop_loss = to_price(stop)?;
        let target = to_price(target)?;

        if stop_loss <= Decimal::ZERO || stop_loss >= buy || target <= buy {
            return None;
        }

        let reward_risk = ((target - buy) / (buy - stop_loss)).round_dp(2);

        Some(TradeLevels {
            buy,
            stop_loss,
            target,
            reward_risk,
        })
    }
}

fn to_price(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(2))
}

impl TradeLevels {
    pub fn reward_risk_f64(&self) -> f64 {
        self.reward_risk.to_f64().unwrap_or(0.0)
    }
}
