//! Retry executor with exponential backoff
//!
//! [`RetryExecutor`] runs an operation up to `max_attempts` times, sleeping
//! between attempts according to a [`BackoffPolicy`]. Which failures are
//! worth retrying is decided by a [`RetryPolicy`] supplied alongside the
//! numeric configuration.
//!
//! The executor never wraps the operation's error: when it gives up, the
//! caller receives exactly the error value produced by the final attempt.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use tether_core::resilience::{policies::AlwaysRetry, RetryConfig, RetryExecutor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RetryConfig::builder()
//!     .max_attempts(5)
//!     .initial_delay(Duration::from_millis(50))
//!     .backoff_multiplier(2.0)
//!     .build()?;
//!
//! let executor = RetryExecutor::new(config, AlwaysRetry);
//! let value: Result<u32, std::io::Error> = executor.execute(|| async { Ok(42) }).await;
//! assert_eq!(value?, 42);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tether_common::{Clock, RuntimeClock};
use tether_domain::RetrySettings;
use tracing::{debug, instrument, warn};

use super::backoff::{validate_multiplier, BackoffPolicy};
use crate::error::{ConfigError, ConfigResult};

/// Decides whether a failed attempt should be retried
///
/// Any `Fn(&E) -> bool` closure is a policy.
pub trait RetryPolicy<E> {
    /// Return `true` if `error` is transient and the operation may be retried
    fn is_retryable(&self, error: &E) -> bool;
}

impl<E, F> RetryPolicy<E> for F
where
    F: Fn(&E) -> bool,
{
    fn is_retryable(&self, error: &E) -> bool {
        self(error)
    }
}

/// Numeric retry configuration
///
/// Built through [`RetryConfig::builder`], which rejects zero attempts and
/// multipliers below 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RetrySettings::DEFAULT_MAX_ATTEMPTS,
            initial_delay: RetrySettings::DEFAULT_INITIAL_DELAY,
            backoff_multiplier: RetrySettings::DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryConfig {
    /// Create a validated configuration
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_multiplier: f64,
    ) -> ConfigResult<Self> {
        Self::builder()
            .max_attempts(max_attempts)
            .initial_delay(initial_delay)
            .backoff_multiplier(backoff_multiplier)
            .build()
    }

    /// Create a configuration builder seeded with the defaults
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Total number of attempts, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the first retry
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Growth factor applied to the delay after each failed attempt
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Backoff schedule described by this configuration
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy::from_validated(self.initial_delay, self.backoff_multiplier)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        validate_multiplier(self.backoff_multiplier)
    }
}

impl TryFrom<&RetrySettings> for RetryConfig {
    type Error = ConfigError;

    fn try_from(settings: &RetrySettings) -> ConfigResult<Self> {
        Self::new(settings.max_attempts, settings.initial_delay, settings.backoff_multiplier)
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.config.backoff_multiplier = multiplier;
        self
    }

    pub fn build(self) -> ConfigResult<RetryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Result of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// The error value itself stays with the executor; only its `Debug`
    /// rendering is kept here
    Failure { description: String },
}

/// Record of one attempt within a retry sequence
#[derive(Debug, Clone)]
pub struct RetryAttempt {
    /// 0-based attempt index
    pub index: u32,
    pub started_at: Instant,
    /// How long the operation itself ran
    pub duration: Duration,
    pub outcome: AttemptOutcome,
    /// Backoff slept after this attempt, if another attempt followed
    pub delay_after: Option<Duration>,
}

impl RetryAttempt {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

/// Outcome of a retry execution including result and attempt history
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
    pub total_delay: Duration,
    pub history: Vec<RetryAttempt>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Average backoff between attempts (excludes operation execution time)
    pub fn average_delay(&self) -> Duration {
        if self.attempts <= 1 {
            return Duration::ZERO;
        }
        self.total_delay / (self.attempts - 1)
    }

    /// Time from the start of the first attempt to the end of the last one
    pub fn total_elapsed(&self) -> Duration {
        match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => {
                last.started_at.saturating_duration_since(first.started_at) + last.duration
            }
            _ => Duration::ZERO,
        }
    }
}

/// The main retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Create with default configuration
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P> RetryExecutor<P> {
    /// Execute an operation with retry logic
    ///
    /// Returns the first success, or the error of the last attempt made
    /// (either the final allowed attempt or the first non-retryable failure).
    #[instrument(skip(self, operation), fields(max_attempts = self.config.max_attempts))]
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return the attempt history
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let clock = RuntimeClock;
        let max_attempts = self.config.max_attempts;
        let backoff = self.config.backoff();

        let mut history = Vec::with_capacity(max_attempts.min(16) as usize);
        let mut total_delay = Duration::ZERO;
        let mut index = 0u32;

        loop {
            let attempt_number = index + 1;
            debug!("Executing operation (attempt {}/{})", attempt_number, max_attempts);

            let started_at = clock.now();
            let result = operation().await;
            let duration = clock.now().saturating_duration_since(started_at);

            let error = match result {
                Ok(value) => {
                    if index > 0 {
                        debug!("Operation succeeded after {} retries", index);
                    }
                    history.push(RetryAttempt {
                        index,
                        started_at,
                        duration,
                        outcome: AttemptOutcome::Success,
                        delay_after: None,
                    });
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt_number,
                        total_delay,
                        history,
                    };
                }
                Err(error) => error,
            };

            let description = format!("{error:?}");
            let failed = |delay_after| RetryAttempt {
                index,
                started_at,
                duration,
                outcome: AttemptOutcome::Failure { description: description.clone() },
                delay_after,
            };

            if !self.policy.is_retryable(&error) {
                debug!("Retry policy determined not to retry: {:?}", error);
                history.push(failed(None));
                return RetryOutcome { result: Err(error), attempts: attempt_number, total_delay, history };
            }

            if attempt_number >= max_attempts {
                warn!(
                    "All retry attempts exhausted after {} tries, last error: {:?}",
                    attempt_number, error
                );
                history.push(failed(None));
                return RetryOutcome { result: Err(error), attempts: attempt_number, total_delay, history };
            }

            let delay = backoff.next_delay(index);
            warn!("Operation failed (attempt {}), retrying after {:?}", attempt_number, delay);
            history.push(failed(Some(delay)));
            drop(error);

            tokio::time::sleep(delay).await;
            total_delay = total_delay.saturating_add(delay);
            index += 1;
        }
    }
}

/// Convenience function to create a retry executor and execute an operation
pub async fn retry_with_policy<F, Fut, T, E, P>(
    config: RetryConfig,
    policy: P,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Debug,
{
    RetryExecutor::new(config, policy).execute(operation).await
}

/// Convenience function: default configuration, every error retryable
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Debug,
{
    retry_with_policy(RetryConfig::default(), policies::AlwaysRetry, operation).await
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use tether_common::ErrorClassification;

    use super::RetryPolicy;

    /// Always retry policy - retries on any error
    #[derive(Debug, Clone, Copy, Default)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn is_retryable(&self, _error: &E) -> bool {
            true
        }
    }

    /// Never retry policy - the first failure is final
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn is_retryable(&self, _error: &E) -> bool {
            false
        }
    }

    /// Predicate-based retry policy
    #[derive(Debug, Clone)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E) -> bool,
    {
        fn is_retryable(&self, error: &E) -> bool {
            (self.predicate)(error)
        }
    }

    /// Defers to the error type's own [`ErrorClassification`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ClassifiedRetry;

    impl<E: ErrorClassification> RetryPolicy<E> for ClassifiedRetry {
        fn is_retryable(&self, error: &E) -> bool {
            let retryable = error.is_retryable();
            // the backoff schedule still decides the delay
            if let (true, Some(hint)) = (retryable, error.retry_after()) {
                tracing::debug!(retry_after_ms = hint.as_millis() as u64, "error suggests a retry delay");
            }
            retryable
        }
    }
}
