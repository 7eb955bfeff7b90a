//! Exponential backoff schedule
//!
//! The delay before retry `n` (0-based index of the attempt that just failed)
//! is `initial_delay * multiplier^n`. Arithmetic is done in floating point
//! nanoseconds and saturates at `Duration::MAX`.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Exponential backoff policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    initial_delay: Duration,
    multiplier: f64,
}

impl BackoffPolicy {
    /// Create a policy, rejecting multipliers below 1.0 and non-finite values
    pub fn new(initial_delay: Duration, multiplier: f64) -> ConfigResult<Self> {
        validate_multiplier(multiplier)?;
        Ok(Self { initial_delay, multiplier })
    }

    pub(crate) fn from_validated(initial_delay: Duration, multiplier: f64) -> Self {
        Self { initial_delay, multiplier }
    }

    /// Delay before the first retry
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Growth factor applied per attempt
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Delay to sleep after the attempt with index `attempt` failed
    pub fn next_delay(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let nanos = self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent);

        if !nanos.is_finite() {
            return Duration::MAX;
        }
        if nanos <= u64::MAX as f64 {
            return Duration::from_nanos(nanos.round() as u64);
        }
        Duration::try_from_secs_f64(nanos / 1e9).unwrap_or(Duration::MAX)
    }

    /// The full delay sequence, starting with the delay after attempt 0
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let policy = *self;
        (0..u32::MAX).map(move |attempt| policy.next_delay(attempt))
    }
}

pub(crate) fn validate_multiplier(multiplier: f64) -> ConfigResult<()> {
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(ConfigError::InvalidMultiplier(multiplier));
    }
    Ok(())
}
