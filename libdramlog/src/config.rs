//! Configuration management for Dramlog

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::BOTTLE_UNIT_CL;
use crate::error::{ConfigError, Result};

/// File name of the event store, kept equal to the browser edition's storage key
pub const STORAGE_KEY: &str = "diageo_whisky_events";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: format!("~/.local/share/dramlog/{}.json", STORAGE_KEY),
        }
    }
}

/// Values used when the matching command-line option is omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub ambassador: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default = "default_start_cl")]
    pub start_cl: u32,
}

fn default_start_cl() -> u32 {
    BOTTLE_UNIT_CL
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ambassador: None,
            organizer: None,
            start_cl: default_start_cl(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing config file yields the built-in defaults.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Resolved path of the event store
    ///
    /// `DRAMLOG_STORE_PATH` takes precedence over `storage.path`.
    pub fn store_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var("DRAMLOG_STORE_PATH") {
            return PathBuf::from(shellexpand::tilde(&path).to_string());
        }
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("DRAMLOG_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("dramlog").join("config.toml"))
}
