//! Sliding-window rate limiter
//!
//! Admits at most `max_calls` operations in any window of length `period`.
//! A caller that arrives while the window is full is suspended until the
//! oldest recorded admission leaves the window, then admitted.
//!
//! The window lives behind an async mutex that stays locked for the whole
//! evict / wait / record sequence, so concurrent callers queue on the lock
//! and the admission bound holds across tasks sharing one limiter.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tether_common::{Clock, RuntimeClock};
use tether_domain::RateLimitSettings;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

/// Validated rate limit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    max_calls: u32,
    period: Duration,
}

impl RateLimitConfig {
    /// Create a configuration, rejecting zero calls or a zero period
    pub fn new(max_calls: u32, period: Duration) -> ConfigResult<Self> {
        if max_calls == 0 {
            return Err(ConfigError::ZeroCalls);
        }
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self { max_calls, period })
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TryFrom<&RateLimitSettings> for RateLimitConfig {
    type Error = ConfigError;

    fn try_from(settings: &RateLimitSettings) -> ConfigResult<Self> {
        Self::new(settings.max_calls, settings.period)
    }
}

/// The host aborted a pending admission
///
/// No timestamp is recorded for an interrupted admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit wait interrupted before admission")]
pub struct WaitInterrupted;

/// Errors from a cancellable rate-limited run
#[derive(Debug, Error)]
pub enum RateLimitError<E> {
    #[error("rate limit wait interrupted before admission")]
    WaitInterrupted,

    /// The operation ran and failed; its error is carried unchanged
    #[error("{0}")]
    Operation(E),
}

impl<E> RateLimitError<E> {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::WaitInterrupted)
    }

    /// The operation's own error, if the operation ran
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(err) => Some(err),
            Self::WaitInterrupted => None,
        }
    }
}

impl<E> From<WaitInterrupted> for RateLimitError<E> {
    fn from(_: WaitInterrupted) -> Self {
        Self::WaitInterrupted
    }
}

/// Admission timestamps, oldest first
#[derive(Debug, Default)]
struct CallWindow {
    timestamps: VecDeque<Instant>,
}

impl CallWindow {
    /// Drop every entry whose age has reached `period`
    fn evict(&mut self, now: Instant, period: Duration) {
        while let Some(oldest) = self.timestamps.front() {
            if now.saturating_duration_since(*oldest) >= period {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.timestamps.len()
    }

    fn oldest(&self) -> Option<Instant> {
        self.timestamps.front().copied()
    }

    fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    fn pop_oldest(&mut self) {
        self.timestamps.pop_front();
    }
}

/// Sliding-window rate limiter
///
/// Share one limiter between tasks with `Arc<SlidingWindowLimiter>`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use tether_core::resilience::{RateLimitConfig, SlidingWindowLimiter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let limiter = SlidingWindowLimiter::new(RateLimitConfig::new(10, Duration::from_secs(60))?);
///
/// let body: Result<&str, std::io::Error> = limiter.run(|| async { Ok("response") }).await;
/// assert_eq!(body?, "response");
/// # Ok(())
/// # }
/// ```
pub struct SlidingWindowLimiter<C: Clock = RuntimeClock> {
    config: RateLimitConfig,
    window: Mutex<CallWindow>,
    clock: C,
}

impl SlidingWindowLimiter<RuntimeClock> {
    /// Create a limiter driven by the runtime clock
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, RuntimeClock)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// Create a limiter with a custom clock
    ///
    /// Waits still sleep on tokio time. The clock is expected to move with
    /// it; if it has not moved after a full wait, the oldest entry is
    /// treated as expired and the caller is admitted.
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self { config, window: Mutex::new(CallWindow::default()), clock }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Number of admissions still inside the window
    pub async fn len(&self) -> usize {
        let mut window = self.window.lock().await;
        window.evict(self.clock.now(), self.config.period);
        window.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Wait until a call is permitted and record it
    pub async fn admit(&self) {
        let mut window = self.window.lock().await;
        let max_calls = self.config.max_calls as usize;
        let period = self.config.period;

        loop {
            let now = self.clock.now();
            window.evict(now, period);

            if window.len() < max_calls {
                window.record(now);
                debug!(in_window = window.len(), max_calls, "Call admitted");
                return;
            }

            let Some(oldest) = window.oldest() else {
                continue;
            };
            let wait = period.saturating_sub(now.saturating_duration_since(oldest));
            debug!(wait_ms = wait.as_millis() as u64, max_calls, "Rate limit reached, waiting");
            tokio::time::sleep(wait).await;

            // a clock that ignores tokio time would otherwise keep us asleep forever
            if self.clock.now() == now {
                window.pop_oldest();
                window.record(now);
                warn!(wait_ms = wait.as_millis() as u64, "Clock did not advance during rate limit wait; admitting");
                return;
            }
        }
    }

    /// Like [`admit`](Self::admit), but gives up when `token` is cancelled
    pub async fn admit_until_cancelled(
        &self,
        token: &CancellationToken,
    ) -> Result<(), WaitInterrupted> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!("Rate limit wait interrupted");
                Err(WaitInterrupted)
            }
            _ = self.admit() => Ok(()),
        }
    }

    /// Admit, then run the operation and return its outcome unchanged
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit().await;
        operation().await
    }

    /// Admit unless `token` is cancelled first, then run the operation
    ///
    /// Cancellation only interrupts the wait for admission; once admitted,
    /// the operation runs to completion.
    pub async fn run_until_cancelled<F, Fut, T, E>(
        &self,
        token: &CancellationToken,
        operation: F,
    ) -> Result<T, RateLimitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit_until_cancelled(token).await?;
        operation().await.map_err(RateLimitError::Operation)
    }
}

impl<C: Clock> fmt::Debug for SlidingWindowLimiter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidingWindowLimiter").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the sliding-window limiter
    //!
    //! Window arithmetic is checked against `MockClock`; anything that
    //! actually waits runs on a paused tokio clock with the runtime clock.

    use std::sync::Arc;

    use tether_common::MockClock;

    use super::*;

    fn config(max_calls: u32, period_ms: u64) -> RateLimitConfig {
        RateLimitConfig::new(max_calls, Duration::from_millis(period_ms)).expect("valid config")
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(RateLimitConfig::new(0, Duration::from_secs(1)), Err(ConfigError::ZeroCalls));
        assert_eq!(RateLimitConfig::new(1, Duration::ZERO), Err(ConfigError::ZeroPeriod));

        let settings = RateLimitSettings { max_calls: 3, period: Duration::from_secs(2) };
        let config = RateLimitConfig::try_from(&settings).expect("valid settings");
        assert_eq!(config.max_calls(), 3);
        assert_eq!(config.period(), Duration::from_secs(2));
    }

    #[test]
    fn test_call_window_evicts_expired_entries() {
        let start = Instant::now();
        let mut window = CallWindow::default();
        window.record(start);
        window.record(start + Duration::from_millis(400));
        window.record(start + Duration::from_millis(900));

        window.evict(start + Duration::from_millis(1000), Duration::from_secs(1));
        assert_eq!(window.len(), 2);
        assert_eq!(window.oldest(), Some(start + Duration::from_millis(400)));

        window.evict(start + Duration::from_millis(1899), Duration::from_secs(1));
        assert_eq!(window.len(), 1);
    }

    /// Validates window bookkeeping against a mock clock.
    ///
    /// Assertions:
    /// - Admissions under the limit are recorded.
    /// - Advancing past the period empties the window.
    #[tokio::test]
    async fn test_len_tracks_mock_clock() {
        let clock = MockClock::new();
        let limiter = SlidingWindowLimiter::with_clock(config(3, 1000), clock.clone());

        limiter.admit().await;
        clock.advance_millis(300);
        limiter.admit().await;
        assert_eq!(limiter.len().await, 2);

        clock.advance_millis(700);
        assert_eq!(limiter.len().await, 1);

        clock.advance_millis(300);
        assert!(limiter.is_empty().await);
    }

    /// A full window behind a clock nobody advances admits after one wait.
    ///
    /// Assertions:
    /// - `admit` returns after sleeping the period once on tokio time.
    /// - The window stays at `max_calls` entries.
    #[tokio::test(start_paused = true)]
    async fn test_stuck_clock_admits_after_one_wait() {
        let clock = MockClock::new();
        let limiter = SlidingWindowLimiter::with_clock(config(2, 1000), clock.clone());
        let started = tokio::time::Instant::now();

        limiter.admit().await;
        limiter.admit().await;
        limiter.admit().await;

        assert_eq!(started.elapsed(), Duration::from_millis(1000));
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(limiter.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admissions_under_limit_do_not_wait() {
        let limiter = SlidingWindowLimiter::new(config(5, 1000));
        let started = tokio::time::Instant::now();

        for _ in 0..5 {
            limiter.admit().await;
        }

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(limiter.len().await, 5);
    }

    /// Validates the wait for the call that exceeds the budget.
    ///
    /// Assertions:
    /// - With `{2, 1s}` and 250ms between the first two calls, the third
    ///   call waits until 1s after the first admission.
    /// - The window still holds at most two entries afterwards.
    #[tokio::test(start_paused = true)]
    async fn test_excess_call_waits_for_oldest_to_expire() {
        let limiter = SlidingWindowLimiter::new(config(2, 1000));
        let started = tokio::time::Instant::now();

        limiter.admit().await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        limiter.admit().await;
        limiter.admit().await;

        assert_eq!(started.elapsed(), Duration::from_millis(1000));
        assert_eq!(limiter.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_operation_outcome() {
        let limiter = SlidingWindowLimiter::new(config(1, 500));

        let ok: Result<u8, &str> = limiter.run(|| async { Ok(7) }).await;
        let err: Result<u8, &str> = limiter.run(|| async { Err("denied") }).await;

        assert_eq!(ok, Ok(7));
        assert_eq!(err, Err("denied"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_records_nothing() {
        let limiter = SlidingWindowLimiter::new(config(1, 60_000));
        limiter.admit().await;

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let result: Result<(), RateLimitError<&str>> =
            limiter.run_until_cancelled(&token, || async { Ok(()) }).await;

        assert!(result.as_ref().is_err_and(RateLimitError::is_interrupted));
        assert_eq!(limiter.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_cancelled_passes_operation_error() {
        let limiter = SlidingWindowLimiter::new(config(2, 1000));
        let token = CancellationToken::new();

        let result: Result<(), RateLimitError<&str>> =
            limiter.run_until_cancelled(&token, || async { Err("upstream 503") }).await;

        let err = result.expect_err("operation error");
        assert_eq!(err.to_string(), "upstream 503");
        assert_eq!(err.into_operation_error(), Some("upstream 503"));
    }

    /// Validates the admission bound across concurrent tasks.
    ///
    /// Assertions:
    /// - Six tasks through a `{2, 1s}` limiter finish at 0s, 0s, 1s, 1s,
    ///   2s, 2s.
    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_respect_budget() {
        let limiter = Arc::new(SlidingWindowLimiter::new(config(2, 1000)));
        let started = tokio::time::Instant::now();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.admit().await;
                started.elapsed()
            }));
        }

        let mut admitted_at = Vec::new();
        for handle in handles {
            admitted_at.push(handle.await.expect("task completes"));
        }
        admitted_at.sort();

        let seconds: Vec<u64> = admitted_at.iter().map(Duration::as_secs).collect();
        assert_eq!(seconds, vec![0, 0, 1, 1, 2, 2]);
    }
}
