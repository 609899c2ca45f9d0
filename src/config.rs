// ABOUTME: Configuration management for Time Tracker
// ABOUTME: Handles database location, export directory and logging preferences in a JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Config directory not found")]
    NoDirFound,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Database file; the per-user data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Where exports land when neither `--output` nor the `export.directory` setting is given
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Decimal places used when rendering hours
    #[serde(default = "default_hours_precision")]
    pub hours_precision: usize,
}

fn default_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_hours_precision() -> usize {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database_path: None,
            export_dir: None,
            log_level: default_log_level(),
            hours_precision: default_hours_precision(),
        }
    }
}

impl AppConfig {
    /// Get the config file path based on OS
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirFound)?;
        let app_dir = config_dir.join("Time Tracker");
        Ok(app_dir.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or write and return the defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_or_create(path).map(|(config, _)| config)
    }

    /// Like `load_from`, also telling whether the defaults were just written
    pub fn load_or_create(path: &Path) -> Result<(Self, bool), ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok((config, true));
        }

        let contents = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok((config, false))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Level filter for the logger, falling back to `info` on unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
