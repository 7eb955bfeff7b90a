//! Integration tests for the retry executor and the sliding-window limiter
//!
//! Every test runs on a paused tokio clock: sleeps resolve as soon as the
//! runtime is idle and `tokio::time::Instant` reports the virtual time that
//! passed.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tether_common::testing::{assert_duration_at_least, assert_duration_in_range};
use tether_common::ErrorClassification;
use tether_core::policies::{AlwaysRetry, ClassifiedRetry};
use tether_core::resilience::{AttemptOutcome, RateLimitError};
use tether_core::{RateLimitConfig, RetryConfig, RetryExecutor, SlidingWindowLimiter};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq, Eq)]
enum ApiError {
    Throttled { attempt: u32 },
    Unauthorized,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Throttled { attempt } => write!(f, "throttled on attempt {attempt}"),
            Self::Unauthorized => f.write_str("unauthorized"),
        }
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

/// Scenario: `{3, 100ms, 2.0}`, operation fails twice then succeeds.
///
/// Assertions:
/// - Success value is returned after 3 attempts.
/// - About 300ms of backoff elapsed (100ms + 200ms).
#[tokio::test(start_paused = true)]
async fn retry_recovers_after_two_failures() {
    let executor = RetryExecutor::new(
        RetryConfig::new(3, Duration::from_millis(100), 2.0).expect("valid config"),
        AlwaysRetry,
    );
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let outcome = executor
        .execute_with_outcome(|| async {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                Err(ApiError::Throttled { attempt })
            } else {
                Ok("report.csv")
            }
        })
        .await;

    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.total_delay, Duration::from_millis(300));
    assert_duration_in_range(started.elapsed(), Duration::from_millis(300), Duration::from_millis(5));
    assert_eq!(outcome.result, Ok("report.csv"));
}

#[tokio::test(start_paused = true)]
async fn retry_exhaustion_returns_final_error_identity() {
    let executor = RetryExecutor::new(
        RetryConfig::new(5, Duration::from_millis(10), 3.0).expect("valid config"),
        ClassifiedRetry,
    );
    let calls = AtomicU32::new(0);

    let outcome = executor
        .execute_with_outcome(|| async {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ApiError::Throttled { attempt })
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(outcome.result, Err(ApiError::Throttled { attempt: 4 }));
    // 10 + 30 + 90 + 270
    assert_eq!(outcome.total_delay, Duration::from_millis(400));
    assert!(outcome.history.iter().all(|attempt| matches!(
        attempt.outcome,
        AttemptOutcome::Failure { .. }
    )));
    assert_eq!(outcome.history.last().and_then(|a| a.delay_after), None);
}

#[tokio::test(start_paused = true)]
async fn retry_classifier_rejection_is_immediate() {
    let executor = RetryExecutor::new(RetryConfig::default(), ClassifiedRetry);
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), ApiError> = executor
        .execute(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Unauthorized)
        })
        .await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

/// Scenario: limiter `{2, 1s}` called three times in quick succession.
///
/// Assertions:
/// - The first two calls do not wait.
/// - The third call waits `1s - (elapsed since first call)`.
#[tokio::test(start_paused = true)]
async fn limiter_third_call_waits_for_window() {
    let limiter = SlidingWindowLimiter::new(
        RateLimitConfig::new(2, Duration::from_secs(1)).expect("valid config"),
    );
    let started = Instant::now();

    limiter.run(|| async { Ok::<_, ApiError>(()) }).await.expect("first call");
    tokio::time::sleep(Duration::from_millis(300)).await;
    limiter.run(|| async { Ok::<_, ApiError>(()) }).await.expect("second call");
    assert_eq!(started.elapsed(), Duration::from_millis(300));

    let before_third = Instant::now();
    limiter.run(|| async { Ok::<_, ApiError>(()) }).await.expect("third call");

    assert_duration_at_least(before_third.elapsed(), Duration::from_millis(700));
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn limiter_bounds_admissions_in_any_window() {
    let limiter = Arc::new(SlidingWindowLimiter::new(
        RateLimitConfig::new(3, Duration::from_millis(500)).expect("valid config"),
    ));
    let started = Instant::now();

    let handles = (0..10).map(|_| {
        let limiter = Arc::clone(&limiter);
        tokio::spawn(async move {
            limiter.admit().await;
            started.elapsed()
        })
    });

    let mut admitted: Vec<Duration> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();
    admitted.sort();

    for (i, at) in admitted.iter().enumerate() {
        let later = admitted[i..].iter().take_while(|t| **t < *at + Duration::from_millis(500));
        assert!(later.count() <= 3, "more than 3 admissions within 500ms of {at:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn limiter_wait_can_be_interrupted() {
    let limiter = SlidingWindowLimiter::new(
        RateLimitConfig::new(1, Duration::from_secs(30)).expect("valid config"),
    );
    limiter.admit().await;

    let token = CancellationToken::new();
    token.cancel();

    let result = limiter.run_until_cancelled(&token, || async { Ok::<_, ApiError>(()) }).await;

    assert!(matches!(result, Err(RateLimitError::WaitInterrupted)));
    assert_eq!(limiter.len().await, 1);
}

/// Retry wrapping a rate-limited operation: each attempt consumes a slot.
#[tokio::test(start_paused = true)]
async fn retry_around_limiter_spaces_attempts() {
    let limiter = SlidingWindowLimiter::new(
        RateLimitConfig::new(1, Duration::from_millis(400)).expect("valid config"),
    );
    let executor = RetryExecutor::new(
        RetryConfig::new(3, Duration::from_millis(50), 1.0).expect("valid config"),
        AlwaysRetry,
    );
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), ApiError> = executor
        .execute(|| {
            limiter.run(|| async {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Throttled { attempt })
            })
        })
        .await;

    assert_eq!(result, Err(ApiError::Throttled { attempt: 2 }));
    assert_eq!(started.elapsed(), Duration::from_millis(800));
}
