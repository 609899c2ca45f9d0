// ABOUTME: Main library for the Time Tracker application
// ABOUTME: Contains app setup, logging, the shared response envelope and module declarations

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

// Module declarations
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod report;
pub mod validation;
pub mod view;

use config::AppConfig;
use db::{StoreError, TrackerStore};

/// Standard response format returned by every command
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub messages: Messages,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Messages {
    pub error: Vec<String>,
    pub warning: Vec<String>,
    pub info: Vec<String>,
    pub success: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            messages: Messages::default(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            messages: Messages {
                error: vec![message],
                ..Default::default()
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_success(mut self, message: impl Into<String>) -> Self {
        self.messages.success.push(message.into());
        self
    }

    pub fn with_info(mut self, message: impl Into<String>) -> Self {
        self.messages.info.push(message.into());
        self
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.messages.warning.push(message.into());
        self
    }
}

/// Something worth logging about the config, held until the logger is up
#[derive(Debug, PartialEq)]
enum ConfigNotice {
    Created(std::path::PathBuf),
    Fallback(String),
}

/// Load the config file, degrading to defaults when it cannot be read
fn load_config(path: Option<&std::path::Path>) -> (AppConfig, Option<ConfigNotice>) {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match AppConfig::config_path() {
            Ok(p) => p,
            Err(e) => {
                let notice = ConfigNotice::Fallback(format!("Using default config: {}", e));
                return (AppConfig::default(), Some(notice));
            }
        },
    };
    match AppConfig::load_or_create(&path) {
        Ok((config, true)) => (config, Some(ConfigNotice::Created(path))),
        Ok((config, false)) => (config, None),
        Err(e) => (
            AppConfig::default(),
            Some(ConfigNotice::Fallback(format!("Using default config: {}", e))),
        ),
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        config.level_filter()
    };
    // RUST_LOG still wins over the configured level
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Open the database named on the command line, in the config, or in the data directory
fn open_store(
    cli_db: Option<std::path::PathBuf>,
    config: &AppConfig,
) -> Result<TrackerStore, StoreError> {
    if let Some(path) = cli_db.or_else(|| config.database_path.clone()) {
        return TrackerStore::open_at(path);
    }
    match TrackerStore::open() {
        Err(StoreError::NoDirFound) => {
            log::warn!("No data directory on this platform, keeping data in memory only");
            TrackerStore::open_in_memory()
        }
        other => other,
    }
}

/// Parse arguments and run one command. Returns whether the command succeeded.
pub fn run() -> anyhow::Result<bool> {
    let cli = cli::Cli::parse();

    let (config, notice) = load_config(cli.config.as_deref());
    init_logging(&config, cli.verbose);
    match notice {
        Some(ConfigNotice::Created(path)) => {
            log::info!("Created default config at {}", path.display())
        }
        Some(ConfigNotice::Fallback(warning)) => log::warn!("{}", warning),
        None => {}
    }

    let store = open_store(cli.db.clone(), &config).context("Failed to open database")?;
    log::debug!(
        "Using database {}",
        store
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    );

    let ok = cli::execute(&cli.command, &store, &config, cli.json)
        .context("Failed to write output")?;
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_builders() {
        let response = ApiResponse::success(5)
            .with_success("done")
            .with_info("fyi")
            .with_warning("careful");
        assert!(response.success);
        assert_eq!(response.data, Some(5));
        assert_eq!(response.messages.success, vec!["done"]);
        assert_eq!(response.messages.info, vec!["fyi"]);
        assert_eq!(response.messages.warning, vec!["careful"]);

        let failed: ApiResponse<()> = ApiResponse::error("nope".to_string());
        assert!(!failed.success);
        assert!(failed.data.is_none());
        assert_eq!(failed.messages.error, vec!["nope"]);
    }

    #[test]
    fn test_response_json_shape() {
        let json = serde_json::to_value(ApiResponse::success("x")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "x");
        assert!(json["messages"]["error"].as_array().unwrap().is_empty());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_open_store_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let from_config = dir.path().join("config.db");
        let from_cli = dir.path().join("cli.db");
        let config = AppConfig {
            database_path: Some(from_config.clone()),
            ..Default::default()
        };

        let store = open_store(Some(from_cli.clone()), &config).unwrap();
        assert_eq!(store.path(), Some(from_cli.as_path()));

        let store = open_store(None, &config).unwrap();
        assert_eq!(store.path(), Some(from_config.as_path()));
    }

    #[test]
    fn test_load_config_degrades_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let (config, notice) = load_config(Some(path.as_path()));
        assert_eq!(config, AppConfig::default());
        assert!(matches!(
            notice,
            Some(ConfigNotice::Fallback(warning)) if warning.starts_with("Using default config")
        ));
    }

    #[test]
    fn test_load_config_reports_created_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let (_, notice) = load_config(Some(path.as_path()));
        assert_eq!(notice, Some(ConfigNotice::Created(path.clone())));

        let (_, notice) = load_config(Some(path.as_path()));
        assert_eq!(notice, None);
    }
}
