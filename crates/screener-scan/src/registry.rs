//! Profile registry.

use std::collections::BTreeMap;

use screener_core::error::ScanError;

use crate::condition::Condition;
use crate::levels::LevelMethod;
use crate::profile::{PassRule, ScanProfile, SortOrder};

/// Registry of available scan profiles, keyed by name.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ScanProfile>,
}

impl ProfileRegistry {
    /// Create a registry with all built-in profiles.
    pub fn new() -> Self {
        let mut profiles = BTreeMap::new();
        for profile in builtin_profiles() {
            profiles.insert(profile.name.clone(), profile);
        }
        Self { profiles }
    }

    /// Add a profile or replace one with the same name.
    pub fn register(&mut self, profile: ScanProfile) -> Result<(), ScanError> {
        profile.validate()?;
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Result<&ScanProfile, ScanError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ScanError::ProfileNotFound(name.to_string()))
    }

    /// Check if a profile exists.
    pub fn exists(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// All profiles, sorted by name.
    pub fn list(&self) -> Vec<&ScanProfile> {
        self.profiles.values().collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn profile(
    name: &str,
    description: &str,
    lookback_days: u32,
    min_bars: usize,
    conditions: Vec<Condition>,
    pass: PassRule,
) -> ScanProfile {
    ScanProfile {
        name: name.to_string(),
        description: description.to_string(),
        lookback_days,
        min_bars,
        conditions,
        pass,
        levels: None,
        min_reward_risk: None,
        sort: SortOrder::None,
    }
}

fn builtin_profiles() -> Vec<ScanProfile> {
    let weekly_gainers = profile(
        "weekly-gainers",
        "Stocks up at least 10% over the last week",
        8,
        6,
        vec![Condition::WindowGainAtLeast { pct: 10.0 }],
        PassRule::CombinedAtLeast { min: 1 },
    );

    let technical = profile(
        "technical",
        "Oversold RSI with bullish MACD and a rising trend",
        90,
        50,
        vec![
            Condition::RsiBelow { max: 30.0 },
            Condition::MacdAboveSignal,
            Condition::SmaFastAboveSlow,
        ],
        PassRule::CombinedAtLeast { min: 3 },
    );

    let breakout = profile(
        "breakout",
        "Close above the prior 20-day high on heavy volume",
        60,
        21,
        vec![
            Condition::Breakout { window: 20 },
            Condition::VolumeSpike { multiple: 1.5 },
            Condition::CloseAboveSma { window: 20 },
        ],
        PassRule::CombinedAtLeast { min: 2 },
    );

    let volume_spike = profile(
        "volume-spike",
        "Volume at twice the 20-day average with accumulation",
        60,
        21,
        vec![
            Condition::VolumeSpike { multiple: 2.0 },
            Condition::AccumulationRising,
        ],
        PassRule::CombinedAtLeast { min: 2 },
    );

    let fundamental = profile(
        "fundamental",
        "Healthy trend backed by value and quality ratios",
        90,
        50,
        vec![
            Condition::RsiBetween {
                min: 40.0,
                max: 70.0,
            },
            Condition::MacdAboveSignal,
            Condition::SmaFastAboveSlow,
            Condition::AccumulationRising,
            Condition::PeBelow { max: 25.0 },
            Condition::PbBelow { max: 3.0 },
            Condition::DebtToEquityBelow { max: 1.0 },
            Condition::RoeAbove { min: 0.15 },
            Condition::EarningsGrowthAbove { min: 0.10 },
        ],
        PassRule::CombinedAtLeast { min: 6 },
    );

    let mut swing = profile(
        "swing",
        "Swing setups with ATR stops and at least 2:1 reward/risk",
        90,
        50,
        vec![
            Condition::RsiBetween {
                min: 40.0,
                max: 65.0,
            },
            Condition::MacdAboveSignal,
            Condition::CloseAboveSma { window: 20 },
            Condition::SmaFastAboveSlow,
        ],
        PassRule::CombinedAtLeast { min: 3 },
    );
    swing.levels = Some(LevelMethod::Atr {
        stop_multiple: 1.0,
        reward_multiple: 3.0,
    });
    swing.min_reward_risk = Some(2.0);
    swing.sort = SortOrder::RewardRiskDesc;

    let mut options = profile(
        "options",
        "Put-heavy option chains with positive momentum and sentiment",
        90,
        50,
        vec![
            Condition::PutCallRatioAbove { min: 1.0 },
            Condition::MacdAboveSignal,
            Condition::CloseAboveSma { window: 20 },
            Condition::SentimentAtLeast { min: 0.05 },
        ],
        PassRule::CombinedAtLeast { min: 3 },
    );
    options.levels = Some(LevelMethod::FixedPercent {
        stop_pct: 5.0,
        target_pct: 10.0,
    });

    vec![
        weekly_gainers,
        technical,
        breakout,
        volume_spike,
        fundamental,
        swing,
        options,
    ]
}
