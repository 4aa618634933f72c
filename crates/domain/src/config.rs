//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_PAGE_SIZE, DEFAULT_PROVIDER_BASE_URL, DEFAULT_SYNC_WINDOW_MONTHS,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

/// Remote calendar provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub calendar_id: String,
    /// Per-request timeout; an expired timeout surfaces as `RemoteUnavailable`.
    pub timeout_seconds: u64,
    /// Total attempts for transient failures (initial try + retries).
    pub max_attempts: u32,
    pub page_size: u32,
}

/// Sync behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Calendar months on each side of today covered by a refresh.
    pub window_months: u32,
    pub sync_on_login: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "calsync.db".to_string(), pool_size: 8, busy_timeout_ms: 5_000 }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            timeout_seconds: 30,
            max_attempts: 3,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { window_months: DEFAULT_SYNC_WINDOW_MONTHS, sync_on_login: true }
    }
}
