//! Execution monitoring wrapper
//!
//! Times an operation, reports success or failure through a [`Notifier`] and
//! hands the operation's result back unchanged. Exactly one notification is
//! attempted per run; delivery problems are logged and never surface to the
//! caller.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tether_common::{Clock, RuntimeClock};
use tracing::{debug, error, warn};

use super::message::{ErrorDetail, NotificationMessage};
use super::ports::Notifier;

/// Monitoring wrapper
#[derive(Clone)]
pub struct MonitoringWrapper<C: Clock = RuntimeClock> {
    notifier: Arc<dyn Notifier>,
    clock: C,
}

impl MonitoringWrapper<RuntimeClock> {
    /// Create a wrapper that reports through `notifier`
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clock(notifier, RuntimeClock)
    }
}

impl<C: Clock> MonitoringWrapper<C> {
    /// Create a wrapper with a custom clock for elapsed-time measurement
    pub fn with_clock(notifier: Arc<dyn Notifier>, clock: C) -> Self {
        Self { notifier, clock }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Run `operation`, report its outcome, and return the outcome as-is
    pub async fn run<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + fmt::Debug,
    {
        let started = self.clock.now();
        let result = operation().await;
        let elapsed = self.clock.now().saturating_duration_since(started);

        let message = match &result {
            Ok(_) => {
                debug!(operation = operation_name, elapsed_ms = elapsed.as_millis() as u64, "Operation succeeded");
                NotificationMessage::success(operation_name, elapsed)
            }
            Err(err) => {
                let detail = ErrorDetail::capture(err);
                error!(
                    operation = operation_name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %detail.message,
                    "Operation failed\n{}",
                    detail.trace
                );
                NotificationMessage::failure(operation_name, elapsed, detail)
            }
        };

        self.deliver(&message).await;
        result
    }

    async fn deliver(&self, message: &NotificationMessage) {
        if let Err(err) = self.notifier.send(message).await {
            warn!(
                operation = %message.operation_name,
                error = %err,
                "Failed to deliver monitoring notification"
            );
        }
    }
}

impl<C: Clock> fmt::Debug for MonitoringWrapper<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringWrapper").finish_non_exhaustive()
    }
}
