//! Scan command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use screener_config::AppConfig;
use screener_core::traits::MarketDataProvider;
use screener_core::types::Ticker;
use screener_data::{CsvDataSource, NseOptionChain, YahooProvider};
use screener_monitor::Dashboard;
use screener_scan::{LexiconScorer, ScanProfile, Scanner};

use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let registry = config.profile_registry().context("Invalid profile in configuration")?;
    let profile_name = args
        .profile
        .as_deref()
        .unwrap_or(&config.scan.default_profile);
    let profile = registry.get(profile_name)?;
    check_offline(profile, args.data.as_deref())?;

    let (label, tickers) = match &args.ticker {
        Some(symbol) => {
            let ticker = Ticker::parse(symbol)?;
            (ticker.to_string(), vec![ticker])
        }
        None => {
            let universes = config.universe_book().context("Invalid universe in configuration")?;
            let name = args
                .universe
                .as_deref()
                .unwrap_or(&config.scan.default_universe);
            (name.to_string(), universes.get(name)?.to_vec())
        }
    };

    let provider: Arc<dyn MarketDataProvider> = match &args.data {
        Some(dir) => Arc::new(
            CsvDataSource::new(dir)
                .with_context(|| format!("Cannot read CSV data from '{}'", dir.display()))?,
        ),
        None => Arc::new(YahooProvider::new(config.provider.yahoo.clone())?),
    };
    info!(provider = provider.name(), profile = %profile.name, "Data source ready");

    let mut scanner = Scanner::new(provider);
    if profile.needs_option_chain() {
        scanner = scanner.with_option_chain(Arc::new(NseOptionChain::new(config.provider.nse.clone())?));
    }
    if profile.needs_sentiment() {
        scanner = scanner.with_headlines(&LexiconScorer::new(), &config.scan.headlines);
        info!(sentiment = ?scanner.sentiment(), "Scored sample headlines");
    }

    let mut report = scanner.run(profile, &label, &tickers).await;
    if args.sort_by_rr {
        report.sort_by_reward_risk();
    }

    // A single ticker is always shown, pass or fail
    let show_all = args.show_all || args.ticker.is_some();

    match args.output {
        OutputFormat::Text => print!("{}", report.summary(show_all)),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Tui => Dashboard::new(config.scan.dashboard_poll_ms)
            .run(&report, show_all)
            .context("Dashboard failed")?,
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Cannot write report to '{}'", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}

/// Option-chain data only exists live, so offline runs cannot use it.
fn check_offline(profile: &ScanProfile, data: Option<&Path>) -> Result<()> {
    if let Some(dir) = data {
        if profile.needs_option_chain() {
            bail!(
                "Profile '{}' needs live NSE option-chain data and cannot run on CSV data from '{}'",
                profile.name,
                dir.display()
            );
        }
    }
    Ok(())
}
