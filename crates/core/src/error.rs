//! Construction-time configuration errors
//!
//! Every wrapper validates its configuration once, when it is built. Nothing
//! in here is ever returned from running an operation.

use tether_domain::TetherError;
use thiserror::Error;

/// Invalid wrapper configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("Invalid configuration: backoff_multiplier must be a finite number >= 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error("Invalid configuration: max_calls must be at least 1")]
    ZeroCalls,

    #[error("Invalid configuration: period must be greater than zero")]
    ZeroPeriod,

    #[error("Invalid configuration: notifier endpoint '{url}' is not usable: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for TetherError {
    fn from(err: ConfigError) -> Self {
        TetherError::Config(err.to_string())
    }
}
