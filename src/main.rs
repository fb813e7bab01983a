//! NSE equity screener CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::load_config;
use screener_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Setup logging; flags win over the config file
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json_logs = cli.json_logs || config.logging.is_json();
    let _log_guard = setup_logging(
        &log_level,
        json_logs,
        config.logging.file.as_deref().map(Path::new),
    )
    .context("Failed to set up logging")?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => cli::commands::scan::run(args, &config).await,
        Commands::Profiles => cli::commands::profiles::run(&config),
        Commands::Universes => cli::commands::universes::run(&config),
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref(), &config),
    }
}
