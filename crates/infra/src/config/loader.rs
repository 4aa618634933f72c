//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. If `CALSYNC_DB_PATH` is set, builds the configuration from the
//!    environment
//! 3. Otherwise probes for a JSON or TOML config file
//! 4. With no file either, falls back to [`Config::default`]
//!
//! ## Environment Variables
//! - `CALSYNC_DB_PATH`: Database file path (required for env loading)
//! - `CALSYNC_DB_POOL_SIZE`: Connection pool size
//! - `CALSYNC_PROVIDER_BASE_URL`: Calendar API base URL
//! - `CALSYNC_PROVIDER_TIMEOUT_SECS`: Per-request provider timeout
//! - `CALSYNC_PROVIDER_MAX_ATTEMPTS`: Attempts for transient provider failures
//! - `CALSYNC_SYNC_WINDOW_MONTHS`: Months either side of today to sync
//! - `CALSYNC_SYNC_ON_LOGIN`: Whether to sync after login (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./calsync.json` or `./calsync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calsync_domain::{CalSyncError, Config, Result};

const DB_PATH_VAR: &str = "CALSYNC_DB_PATH";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CalSyncError::Config` if an environment variable holds an invalid
/// value or the probed config file cannot be parsed.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if std::env::var_os(DB_PATH_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found; using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `CALSYNC_DB_PATH` must be present; every other variable is optional and
/// falls back to the default value.
///
/// # Errors
/// Returns `CalSyncError::Config` if `CALSYNC_DB_PATH` is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var(DB_PATH_VAR)?;
    if let Some(pool_size) = env_parse::<u32>("CALSYNC_DB_POOL_SIZE", "pool size")? {
        config.database.pool_size = pool_size;
    }

    if let Ok(base_url) = std::env::var("CALSYNC_PROVIDER_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Some(timeout) = env_parse::<u64>("CALSYNC_PROVIDER_TIMEOUT_SECS", "provider timeout")? {
        config.provider.timeout_seconds = timeout;
    }
    if let Some(attempts) =
        env_parse::<u32>("CALSYNC_PROVIDER_MAX_ATTEMPTS", "provider max attempts")?
    {
        config.provider.max_attempts = attempts;
    }

    if let Some(months) = env_parse::<u32>("CALSYNC_SYNC_WINDOW_MONTHS", "sync window")? {
        config.sync.window_months = months;
    }
    config.sync.sync_on_login = env_bool("CALSYNC_SYNC_ON_LOGIN", config.sync.sync_on_login);

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CalSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalSyncError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalSyncError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CalSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("calsync.json"),
        dir.join("calsync.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Reject values no component can work with.
fn validate(config: &Config) -> Result<()> {
    if config.database.path.trim().is_empty() {
        return Err(CalSyncError::Config("database.path must not be empty".into()));
    }
    if config.database.pool_size == 0 {
        return Err(CalSyncError::Config("database.pool_size must be at least 1".into()));
    }
    if config.provider.timeout_seconds == 0 {
        return Err(CalSyncError::Config("provider.timeout_seconds must be at least 1".into()));
    }
    if config.provider.max_attempts == 0 {
        return Err(CalSyncError::Config("provider.max_attempts must be at least 1".into()));
    }
    if config.sync.window_months == 0 {
        return Err(CalSyncError::Config("sync.window_months must be at least 1".into()));
    }
    Ok(())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CalSyncError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CalSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, failing on malformed values.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CalSyncError::Config(format!("Invalid {what} in {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
