//! Notification message model and text rendering
//!
//! The rendered text is platform independent; notifiers only decide how to
//! wrap it in a JSON payload.

use std::fmt;
use std::time::Duration;

use tether_common::format_elapsed;

/// Whether the monitored operation succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure,
}

/// Error message plus rendered trace of a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub trace: String,
}

impl ErrorDetail {
    /// Capture the detail of `error`
    ///
    /// The trace is the error's `Debug` rendering. For `anyhow`-style errors
    /// that includes the source chain and the backtrace recorded where the
    /// error was created (when `RUST_BACKTRACE` enables capture).
    pub fn capture<E>(error: &E) -> Self
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        let trace = format!("{error:?}");
        Self { message: error.to_string(), trace }
    }
}

/// A single success or failure report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub status: ExecutionStatus,
    pub operation_name: String,
    pub elapsed: Duration,
    /// Present exactly when `status` is `Failure`
    pub error_detail: Option<ErrorDetail>,
}

impl NotificationMessage {
    pub fn success(operation_name: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status: ExecutionStatus::Success,
            operation_name: operation_name.into(),
            elapsed,
            error_detail: None,
        }
    }

    pub fn failure(operation_name: impl Into<String>, elapsed: Duration, detail: ErrorDetail) -> Self {
        Self {
            status: ExecutionStatus::Failure,
            operation_name: operation_name.into(),
            elapsed,
            error_detail: Some(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Render the human readable text posted to every platform
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = format_elapsed(self.elapsed);

        match (&self.status, &self.error_detail) {
            (ExecutionStatus::Success, _) => write!(
                f,
                "✅ Execution completed successfully\nFunction: {}\nElapsed: {}",
                self.operation_name, elapsed
            ),
            (ExecutionStatus::Failure, detail) => {
                let (message, trace) = detail
                    .as_ref()
                    .map_or(("unknown error", ""), |d| (d.message.as_str(), d.trace.as_str()));
                write!(
                    f,
                    "❌ An error occurred: {}\nFunction: {}\nElapsed: {}\nStack trace:\n{}",
                    message, self.operation_name, elapsed, trace
                )
            }
        }
    }
}
