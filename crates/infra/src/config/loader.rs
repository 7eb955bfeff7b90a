//! Configuration loader
//!
//! Loads the harness configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. Only if none are set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TETHER_RETRY_MAX_ATTEMPTS`: Total attempts including the first
//! - `TETHER_RETRY_INITIAL_DELAY_MS`: Delay before the first retry
//! - `TETHER_RETRY_BACKOFF_MULTIPLIER`: Growth factor between retries
//! - `TETHER_RATE_LIMIT_MAX_CALLS`: Admissions per window
//! - `TETHER_RATE_LIMIT_PERIOD_MS`: Window length
//! - `TETHER_NOTIFIER_PLATFORM`: `discord` or `teams`
//! - `TETHER_NOTIFIER_WEBHOOK_URL`: Webhook endpoint
//! - `TETHER_NOTIFIER_TIMEOUT_MS`: HTTP timeout per delivery (optional)
//!
//! Retry variables fall back to their defaults. The rate limit and notifier
//! sections are enabled when any of their variables is set, and then need
//! every non-optional variable of the section.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./tether.json` or `./tether.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tether_domain::{
    HarnessConfig, NotifierPlatform, NotifierSettings, RateLimitSettings, Result, RetrySettings,
    TetherError,
};

const RETRY_MAX_ATTEMPTS: &str = "TETHER_RETRY_MAX_ATTEMPTS";
const RETRY_INITIAL_DELAY_MS: &str = "TETHER_RETRY_INITIAL_DELAY_MS";
const RETRY_BACKOFF_MULTIPLIER: &str = "TETHER_RETRY_BACKOFF_MULTIPLIER";
const RATE_LIMIT_MAX_CALLS: &str = "TETHER_RATE_LIMIT_MAX_CALLS";
const RATE_LIMIT_PERIOD_MS: &str = "TETHER_RATE_LIMIT_PERIOD_MS";
const NOTIFIER_PLATFORM: &str = "TETHER_NOTIFIER_PLATFORM";
const NOTIFIER_WEBHOOK_URL: &str = "TETHER_NOTIFIER_WEBHOOK_URL";
const NOTIFIER_TIMEOUT_MS: &str = "TETHER_NOTIFIER_TIMEOUT_MS";

const ALL_VARS: [&str; 8] = [
    RETRY_MAX_ATTEMPTS,
    RETRY_INITIAL_DELAY_MS,
    RETRY_BACKOFF_MULTIPLIER,
    RATE_LIMIT_MAX_CALLS,
    RATE_LIMIT_PERIOD_MS,
    NOTIFIER_PLATFORM,
    NOTIFIER_WEBHOOK_URL,
    NOTIFIER_TIMEOUT_MS,
];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when any `TETHER_*` variable is set;
/// otherwise falls back to a config file. Errors in the environment values
/// are returned, never replaced by file contents.
///
/// # Errors
/// Returns `TetherError::Config` if:
/// - A `TETHER_*` value cannot be parsed or a section is incomplete
/// - No variable is set and no config file can be loaded
/// - File format is invalid
pub fn load() -> Result<HarnessConfig> {
    if !any_set(&ALL_VARS) {
        tracing::debug!("No TETHER_* environment variables set, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `TetherError::Config` if no `TETHER_*` variable is set, a
/// section is incomplete, or a value cannot be parsed.
pub fn load_from_env() -> Result<HarnessConfig> {
    if !any_set(&ALL_VARS) {
        return Err(TetherError::Config("No TETHER_* environment variables set".to_string()));
    }

    let defaults = RetrySettings::default();
    let retry = RetrySettings {
        max_attempts: env_parse(RETRY_MAX_ATTEMPTS)?.unwrap_or(defaults.max_attempts),
        initial_delay: env_millis(RETRY_INITIAL_DELAY_MS)?.unwrap_or(defaults.initial_delay),
        backoff_multiplier: env_parse(RETRY_BACKOFF_MULTIPLIER)?
            .unwrap_or(defaults.backoff_multiplier),
    };

    let rate_limit = if any_set(&[RATE_LIMIT_MAX_CALLS, RATE_LIMIT_PERIOD_MS]) {
        Some(RateLimitSettings {
            max_calls: required(RATE_LIMIT_MAX_CALLS, env_parse(RATE_LIMIT_MAX_CALLS)?)?,
            period: required(RATE_LIMIT_PERIOD_MS, env_millis(RATE_LIMIT_PERIOD_MS)?)?,
        })
    } else {
        None
    };

    let notifier = if any_set(&[NOTIFIER_PLATFORM, NOTIFIER_WEBHOOK_URL, NOTIFIER_TIMEOUT_MS]) {
        Some(NotifierSettings {
            platform: NotifierPlatform::from_str(&env_var(NOTIFIER_PLATFORM)?)?,
            webhook_url: env_var(NOTIFIER_WEBHOOK_URL)?,
            timeout: env_millis(NOTIFIER_TIMEOUT_MS)?,
        })
    } else {
        None
    };

    Ok(HarnessConfig { retry, rate_limit, notifier })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TetherError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<HarnessConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TetherError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TetherError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TetherError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<HarnessConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TetherError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TetherError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TetherError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 8] {
    [
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("tether.json"),
        dir.join("tether.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn any_set(keys: &[&str]) -> bool {
    keys.iter().any(|key| std::env::var_os(key).is_some())
}

/// Get required environment variable
///
/// # Errors
/// Returns `TetherError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| TetherError::Config(format!("Missing required environment variable: {}", key)))
}

fn required<T>(key: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        TetherError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
///
/// Returns `Ok(None)` when the variable is not set.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TetherError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

fn env_millis(key: &str) -> Result<Option<Duration>> {
    Ok(env_parse::<u64>(key)?.map(Duration::from_millis))
}
