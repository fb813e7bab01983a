//! List profiles command.

use anyhow::Result;
use screener_config::AppConfig;
use screener_scan::{LevelMethod, PassRule, SortOrder};

pub fn run(config: &AppConfig) -> Result<()> {
    let registry = config.profile_registry()?;

    println!("Available Scan Profiles");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for profile in registry.list() {
        println!("  {}", profile.name);
        println!("  ───────────────────────────────────────────────────────");
        if !profile.description.is_empty() {
            println!("  {}", profile.description);
        }
        println!(
            "  Lookback: {} sessions, min {} bars",
            profile.lookback_days, profile.min_bars
        );
        println!("  Conditions: {}", profile.conditions_label());
        match &profile.pass {
            PassRule::CombinedAtLeast { min } => println!("  Pass: combined score >= {min}"),
            PassRule::EachAtLeast {
                technical,
                fundamental,
            } => println!("  Pass: technical >= {technical} and fundamental >= {fundamental}"),
        }
        match &profile.levels {
            Some(LevelMethod::FixedPercent { stop_pct, target_pct }) => {
                println!("  Levels: stop -{stop_pct}%, target +{target_pct}%")
            }
            Some(LevelMethod::Atr {
                stop_multiple,
                reward_multiple,
            }) => println!("  Levels: stop {stop_multiple}x ATR, target {reward_multiple}x risk"),
            None => {}
        }
        if let Some(min) = profile.min_reward_risk {
            println!("  Min reward/risk: {min}");
        }
        if profile.sort == SortOrder::RewardRiskDesc {
            println!("  Sorted by reward/risk");
        }
        println!();
    }

    println!("Use `scan --profile <name>` to run one.");

    Ok(())
}
