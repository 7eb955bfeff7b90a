//! Resilience wrappers
//!
//! - **Retry**: [`RetryExecutor`] re-runs a failing operation with exponential
//!   backoff ([`BackoffPolicy`]) while a [`RetryPolicy`] says the error is
//!   transient
//! - **Rate limiting**: [`SlidingWindowLimiter`] caps admissions per sliding
//!   period and suspends callers that would exceed it
//!
//! Both wrappers are transparent: the operation's success value and error
//! value pass through untouched.

pub mod backoff;
pub mod rate_limiter;
pub mod retry;

pub use backoff::BackoffPolicy;
pub use rate_limiter::{RateLimitConfig, RateLimitError, SlidingWindowLimiter, WaitInterrupted};
pub use retry::{
    policies, retry, retry_with_policy, AttemptOutcome, RetryAttempt, RetryConfig,
    RetryConfigBuilder, RetryExecutor, RetryOutcome, RetryPolicy,
};
