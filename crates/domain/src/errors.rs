//! Error types used by Tether entry points

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tether setup and infrastructure code.
///
/// Operation errors never pass through this type: the wrappers return the
/// wrapped operation's own error unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TetherError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Tether setup operations
pub type Result<T> = std::result::Result<T, TetherError>;
