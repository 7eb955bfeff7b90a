//! Configuration DTOs
//!
//! These structures mirror the on-disk / environment configuration one to
//! one. Durations are stored as milliseconds. Range checks (at least one
//! attempt, a positive period, ...) happen when the core converts them into
//! its validated config types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tether_common::{duration_millis, optional_duration_millis};

use crate::errors::TetherError;

/// Top-level harness configuration
///
/// Each section configures one wrapper. Rate limiting and notification are
/// optional; retry always has a section, and its defaults reproduce a
/// three-attempt exponential backoff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub retry: RetrySettings,
    pub rate_limit: Option<RateLimitSettings>,
    pub notifier: Option<NotifierSettings>,
}

/// Retry section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    #[serde(rename = "initial_delay_ms", with = "duration_millis")]
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetrySettings {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            backoff_multiplier: Self::DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

/// Rate limit section: at most `max_calls` admissions per sliding `period`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub max_calls: u32,
    #[serde(rename = "period_ms", with = "duration_millis")]
    pub period: Duration,
}

/// Notifier section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierSettings {
    pub platform: NotifierPlatform,
    pub webhook_url: String,
    /// HTTP timeout for a single delivery; the HTTP client default applies
    /// when unset
    #[serde(
        rename = "timeout_ms",
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_duration_millis"
    )]
    pub timeout: Option<Duration>,
}

/// Chat platform a notifier posts to
///
/// Selects the JSON payload shape; the notification text is the same for
/// every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierPlatform {
    Discord,
    Teams,
}

impl NotifierPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Teams => "teams",
        }
    }
}

impl fmt::Display for NotifierPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifierPlatform {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discord" => Ok(Self::Discord),
            "teams" => Ok(Self::Teams),
            other => Err(TetherError::Config(format!(
                "unknown notifier platform '{other}' (expected 'discord' or 'teams')"
            ))),
        }
    }
}
