//! Scan profile definitions.

use serde::{Deserialize, Serialize};

use screener_core::error::ScanError;

use crate::condition::{Category, Condition, ScanContext};
use crate::levels::LevelMethod;
use crate::result::Scores;

/// How scores turn into a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PassRule {
    /// technical + fundamental ≥ `min`
    CombinedAtLeast { min: u32 },
    /// Each category clears its own floor
    EachAtLeast { technical: u32, fundamental: u32 },
}

impl PassRule {
    pub fn passes(&self, scores: &Scores) -> bool {
        match self {
            PassRule::CombinedAtLeast { min } => scores.total() >= *min,
            PassRule::EachAtLeast {
                technical,
                fundamental,
            } => scores.technical >= *technical && scores.fundamental >= *fundamental,
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Universe order
    #[default]
    None,
    /// Highest reward/risk first; rows without levels last
    RewardRiskDesc,
}

/// A named screener variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Trading sessions of history to request
    pub lookback_days: u32,
    /// Tickers with fewer bars are skipped, never scored
    pub min_bars: usize,
    pub conditions: Vec<Condition>,
    pub pass: PassRule,
    #[serde(default)]
    pub levels: Option<LevelMethod>,
    #[serde(default)]
    pub min_reward_risk: Option<f64>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ScanProfile {
    pub fn validate(&self) -> Result<(), ScanError> {
        let invalid = |msg: String| ScanError::InvalidProfile(format!("{}: {}", self.name, msg));

        if self.name.trim().is_empty() {
            return Err(ScanError::InvalidProfile("profile name is empty".to_string()));
        }
        if self.lookback_days == 0 {
            return Err(invalid("lookback_days must be positive".to_string()));
        }
        if self.conditions.is_empty() {
            return Err(invalid("no conditions".to_string()));
        }
        for condition in &self.conditions {
            condition.validate().map_err(invalid)?;
        }

        let longest = self.longest_window();
        if self.min_bars < longest.max(1) {
            return Err(invalid(format!(
                "min_bars {} is below the longest window ({longest} bars)",
                self.min_bars
            )));
        }

        let technical = self.count(Category::Technical);
        let fundamental = self.count(Category::Fundamental);
        let reachable = match self.pass {
            PassRule::CombinedAtLeast { min } => min as usize <= technical + fundamental,
            PassRule::EachAtLeast {
                technical: t,
                fundamental: f,
            } => t as usize <= technical && f as usize <= fundamental,
        };
        if !reachable {
            return Err(invalid("pass rule can never be met".to_string()));
        }

        if let Some(levels) = &self.levels {
            levels.validate().map_err(invalid)?;
        }
        if self.min_reward_risk.is_some() && self.levels.is_none() {
            return Err(invalid("min_reward_risk requires levels".to_string()));
        }

        Ok(())
    }

    /// Bars the most demanding condition (or ATR levels) needs.
    pub fn longest_window(&self) -> usize {
        let levels = match self.levels {
            Some(LevelMethod::Atr { .. }) => 15,
            _ => 0,
        };
        self.conditions
            .iter()
            .map(Condition::required_bars)
            .max()
            .unwrap_or(0)
            .max(levels)
    }

    fn count(&self, category: Category) -> usize {
        self.conditions
            .iter()
            .filter(|c| c.category() == category)
            .count()
    }

    pub fn needs_fundamentals(&self) -> bool {
        self.count(Category::Fundamental) > 0
    }

    pub fn needs_option_chain(&self) -> bool {
        self.conditions.iter().any(Condition::needs_option_chain)
    }

    pub fn needs_sentiment(&self) -> bool {
        self.conditions.iter().any(Condition::needs_sentiment)
    }

    /// Score one ticker; also returns the labels of passing conditions.
    pub fn score(&self, ctx: &ScanContext<'_>) -> (Scores, Vec<String>) {
        let mut scores = Scores::default();
        let mut passed = Vec::new();

        for condition in &self.conditions {
            if condition.evaluate(ctx) {
                match condition.category() {
                    Category::Technical => scores.technical += 1,
                    Category::Fundamental => scores.fundamental += 1,
                }
                passed.push(condition.to_string());
            }
        }

        (scores, passed)
    }

    /// Short form of the conditions, e.g. `RSI<30, MACD>Signal`.
    pub fn conditions_label(&self) -> String {
        self.conditions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
