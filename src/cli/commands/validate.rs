//! Validate configuration command.

use anyhow::{Context, Result};
use std::path::Path;

use screener_config::{AppConfig, DEFAULT_CONFIG_PATH};

pub fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    let source = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    println!("Validating configuration: {:?}", source);

    let registry = config.profile_registry().context("Profile validation failed")?;
    let universes = config.universe_book().context("Universe validation failed")?;
    registry
        .get(&config.scan.default_profile)
        .context("scan.default_profile does not name a profile")?;
    universes
        .get(&config.scan.default_universe)
        .context("scan.default_universe does not name a universe")?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Profiles: {}", registry.names().join(", "));
    println!("Universes: {}", universes.names().join(", "));
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
