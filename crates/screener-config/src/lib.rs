//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig, ProviderSettings, ScanSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable prefix, e.g. `SCREENER__SCAN__DEFAULT_PROFILE`.
pub const ENV_PREFIX: &str = "SCREENER";

/// Load configuration from file and environment.
///
/// An explicit path must exist; without one the default path is read if
/// present and built-in defaults apply otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_with_env(path: Option<&Path>, env: Environment) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
    };

    let config = Config::builder().add_source(file).add_source(env).build()?;

    config.try_deserialize()
}
