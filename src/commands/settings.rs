// ABOUTME: Settings and status commands
// ABOUTME: Reads and writes key/value settings and reports where data is stored

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::TrackerStore;
use crate::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub mode: String,
    #[serde(default)]
    pub database: Option<String>,
    pub projects: usize,
    pub entries: u32,
}

/// Get all settings
pub fn list_settings(store: &TrackerStore) -> ApiResponse<BTreeMap<String, String>> {
    match store.get_all_settings() {
        Ok(settings) => ApiResponse::success(settings),
        Err(e) => ApiResponse::error(format!("Failed to get settings: {}", e)),
    }
}

/// Get one setting
pub fn get_setting(store: &TrackerStore, key: &str) -> ApiResponse<Setting> {
    match store.get_setting(key, None) {
        Ok(Some(value)) => ApiResponse::success(Setting {
            key: key.to_string(),
            value,
        }),
        Ok(None) => ApiResponse::error(format!("Setting not found: {}", key)),
        Err(e) => ApiResponse::error(format!("Failed to get setting: {}", e)),
    }
}

/// Insert or update a setting
pub fn set_setting(store: &TrackerStore, key: &str, value: &str) -> ApiResponse<Setting> {
    let key = key.trim();
    if key.is_empty() {
        return ApiResponse::error("Please enter a setting key".to_string());
    }

    match store.set_setting(key, value) {
        Ok(_) => ApiResponse::success(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
        .with_success(format!("Setting '{}' saved", key)),
        Err(e) => ApiResponse::error(format!("Failed to update setting: {}", e)),
    }
}

/// Remove a setting
pub fn unset_setting(store: &TrackerStore, key: &str) -> ApiResponse<()> {
    match store.delete_setting(key) {
        Ok(true) => ApiResponse::success(()).with_success(format!("Setting '{}' removed", key)),
        Ok(false) => ApiResponse::success(()).with_warning(format!("Setting '{}' was not set", key)),
        Err(e) => ApiResponse::error(format!("Failed to remove setting: {}", e)),
    }
}

/// Describe where data lives and how much of it there is
pub fn get_status(store: &TrackerStore) -> ApiResponse<StoreStatus> {
    let projects = match store.get_all_projects() {
        Ok(p) => p.len(),
        Err(e) => return ApiResponse::error(format!("Failed to get projects: {}", e)),
    };
    let entries = match store.count_entries() {
        Ok(n) => n,
        Err(e) => return ApiResponse::error(format!("Failed to count entries: {}", e)),
    };

    let (mode, database) = match store.path() {
        Some(path) => ("sqlite", Some(path.to_string_lossy().to_string())),
        None => ("memory", None),
    };

    ApiResponse::success(StoreStatus {
        mode: mode.to_string(),
        database,
        projects,
        entries,
    })
}
