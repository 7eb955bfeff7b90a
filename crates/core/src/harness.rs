//! Composition of the three wrappers
//!
//! A [`Harness`] nests the wrappers as `Monitoring(Retry(RateLimit(op)))`:
//! every attempt is admitted through the limiter, retries back off between
//! attempts, and the whole retried sequence is timed and reported once.
//! Each layer is optional.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::monitoring::{MonitoringWrapper, Notifier};
use crate::resilience::policies::AlwaysRetry;
use crate::resilience::{RateLimitConfig, RetryConfig, RetryExecutor, RetryPolicy, SlidingWindowLimiter};

/// Wrapper stack around an operation
pub struct Harness<P = AlwaysRetry> {
    retry: Option<RetryExecutor<P>>,
    limiter: Option<Arc<SlidingWindowLimiter>>,
    monitoring: Option<MonitoringWrapper>,
}

impl Harness<AlwaysRetry> {
    pub fn builder() -> HarnessBuilder<AlwaysRetry> {
        HarnessBuilder::new()
    }
}

impl<P> Harness<P> {
    pub fn retry(&self) -> Option<&RetryExecutor<P>> {
        self.retry.as_ref()
    }

    pub fn limiter(&self) -> Option<&Arc<SlidingWindowLimiter>> {
        self.limiter.as_ref()
    }

    pub fn monitoring(&self) -> Option<&MonitoringWrapper> {
        self.monitoring.as_ref()
    }

    /// Run `operation` through every configured layer
    ///
    /// `operation` is invoked once per attempt, so it must be callable more
    /// than once when retry is enabled.
    pub async fn run<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + fmt::Debug,
    {
        match &self.monitoring {
            Some(monitoring) => monitoring.run(operation_name, || self.run_retried(&operation)).await,
            None => self.run_retried(&operation).await,
        }
    }

    async fn run_retried<F, Fut, T, E>(&self, operation: &F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Debug,
    {
        match &self.retry {
            Some(executor) => executor.execute(|| self.run_limited(operation)).await,
            None => self.run_limited(operation).await,
        }
    }

    async fn run_limited<F, Fut, T, E>(&self, operation: &F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(limiter) = &self.limiter {
            limiter.admit().await;
        }
        operation().await
    }
}

impl<P> fmt::Debug for Harness<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("retry", &self.retry.as_ref().map(RetryExecutor::config))
            .field("limiter", &self.limiter)
            .field("monitoring", &self.monitoring.is_some())
            .finish()
    }
}

/// Builder for [`Harness`]
pub struct HarnessBuilder<P = AlwaysRetry> {
    retry: Option<RetryExecutor<P>>,
    limiter: Option<Arc<SlidingWindowLimiter>>,
    monitoring: Option<MonitoringWrapper>,
}

impl Default for HarnessBuilder<AlwaysRetry> {
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessBuilder<AlwaysRetry> {
    pub fn new() -> Self {
        Self { retry: None, limiter: None, monitoring: None }
    }
}

impl<P> HarnessBuilder<P> {
    /// Enable retry with the given configuration and classifier
    pub fn retry<Q>(self, config: RetryConfig, policy: Q) -> HarnessBuilder<Q> {
        HarnessBuilder {
            retry: Some(RetryExecutor::new(config, policy)),
            limiter: self.limiter,
            monitoring: self.monitoring,
        }
    }

    /// Enable rate limiting with a limiter owned by this harness
    pub fn rate_limit(self, config: RateLimitConfig) -> Self {
        self.shared_limiter(Arc::new(SlidingWindowLimiter::new(config)))
    }

    /// Enable rate limiting through a limiter shared with other callers
    pub fn shared_limiter(mut self, limiter: Arc<SlidingWindowLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Enable monitoring through `notifier`
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.monitoring = Some(MonitoringWrapper::new(notifier));
        self
    }

    pub fn monitoring(mut self, monitoring: MonitoringWrapper) -> Self {
        self.monitoring = Some(monitoring);
        self
    }

    pub fn build(self) -> Harness<P> {
        Harness { retry: self.retry, limiter: self.limiter, monitoring: self.monitoring }
    }
}
