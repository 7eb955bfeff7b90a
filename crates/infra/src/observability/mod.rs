//! Tracing subscriber setup
//!
//! Binaries embedding the harness call [`init_tracing`] once at startup.
//! `RUST_LOG` wins over the configured default level.

use std::fmt;
use std::str::FromStr;

use tether_domain::{Result, TetherError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line output
    Compact,
}

impl FromStr for LogFormat {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(TetherError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        })
    }
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is unset
    pub default_level: LevelFilter,
    pub format: LogFormat,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { default_level: LevelFilter::INFO, format: LogFormat::Pretty, include_target: true }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::builder().with_default_directive(self.default_level.into()).from_env_lossy()
    }
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns `TetherError::Internal` if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(fmt_layer::layer().pretty().with_target(config.include_target))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt_layer::layer().json().with_target(config.include_target))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt_layer::layer().compact().with_target(config.include_target))
            .try_init(),
    };

    result.map_err(|e| TetherError::Internal(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" compact ".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!(matches!("xml".parse::<LogFormat>(), Err(TetherError::Config(_))));
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = LoggingConfig::default().with_format(LogFormat::Compact).with_level(LevelFilter::DEBUG);

        // another test may have installed a subscriber first
        let _ = init_tracing(&config);

        let err = init_tracing(&config).expect_err("global subscriber already set");
        assert!(matches!(err, TetherError::Internal(_)));
    }
}
