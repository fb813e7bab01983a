//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use screener_core::error::ScanError;
use screener_data::{NseConfig, UniverseBook, YahooConfig};
use screener_scan::{ProfileRegistry, ScanProfile, SAMPLE_HEADLINES};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub scan: ScanSettings,
    /// Extra universes; a built-in name replaces that list
    #[serde(default)]
    pub universes: BTreeMap<String, Vec<String>>,
    /// Extra profiles; a built-in name replaces that profile
    #[serde(default)]
    pub profiles: Vec<ScanProfile>,
}

impl AppConfig {
    /// Built-in profiles with configured ones layered on top.
    pub fn profile_registry(&self) -> Result<ProfileRegistry, ScanError> {
        let mut registry = ProfileRegistry::new();
        for profile in &self.profiles {
            registry.register(profile.clone())?;
        }
        Ok(registry)
    }

    /// Built-in universes with configured ones layered on top.
    pub fn universe_book(&self) -> Result<UniverseBook, ScanError> {
        let mut book = UniverseBook::builtin();
        for (name, symbols) in &self.universes {
            book.insert(name, symbols)?;
        }
        Ok(book)
    }

    /// Render back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "nse-screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Upstream data endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderSettings {
    #[serde(default)]
    pub yahoo: YahooConfig,
    #[serde(default)]
    pub nse: NseConfig,
}

/// Scan defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub default_profile: String,
    pub default_universe: String,
    /// Headlines scored for sentiment conditions
    pub headlines: Vec<String>,
    /// Key poll interval of the dashboard
    pub dashboard_poll_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            default_profile: "technical".to_string(),
            default_universe: "nifty50".to_string(),
            headlines: SAMPLE_HEADLINES.iter().map(|h| h.to_string()).collect(),
            dashboard_poll_ms: 250,
        }
    }
}
