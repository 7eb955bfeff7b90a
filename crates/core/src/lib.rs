//! # Tether Core
//!
//! Composable execution wrappers - no HTTP, no file I/O.
//!
//! This crate contains:
//! - Retry with exponential backoff (`resilience::retry`)
//! - Sliding-window rate limiting (`resilience::rate_limiter`)
//! - Execution monitoring and the notifier port (`monitoring`)
//! - The `Harness` that nests all three
//!
//! ## Architecture Principles
//! - Only depends on `tether-common` and `tether-domain`
//! - Notification transports are injected through the [`Notifier`] trait
//! - Wrappers never alter the wrapped operation's value or error

pub mod error;
pub mod harness;
pub mod monitoring;
pub mod resilience;

pub use error::{ConfigError, ConfigResult};
pub use harness::{Harness, HarnessBuilder};
pub use monitoring::{
    ErrorDetail, ExecutionStatus, MonitoringWrapper, NoopNotifier, NotificationMessage, Notifier,
    NotifierConfig, NotifyError,
};
pub use resilience::{
    policies, BackoffPolicy, RateLimitConfig, RateLimitError, RetryConfig, RetryExecutor,
    RetryPolicy, SlidingWindowLimiter,
};
