//! Error classification shared across Tether crates
//!
//! Operation error types can implement [`ErrorClassification`] to declare
//! which failures are transient. The retry executor's `ClassifiedRetry`
//! policy consumes it, so an error type that knows its own retryability does
//! not need a hand-written predicate at every call site.
//!
//! ```rust
//! use tether_common::ErrorClassification;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Timeout,
//!     NotFound,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert!(FetchError::Timeout.is_retryable());
//! assert!(!FetchError::NotFound.is_retryable());
//! ```

use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are typically transient issues that may succeed if
    /// attempted again, such as:
    /// - Network timeouts
    /// - Rate limiting by the remote side
    /// - Temporary service unavailability
    fn is_retryable(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Informational only: the retry executor always follows its own backoff
    /// schedule, but callers may log or surface this value.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl<T: ErrorClassification + ?Sized> ErrorClassification for Box<T> {
    fn is_retryable(&self) -> bool {
        (**self).is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        (**self).retry_after()
    }
}

impl ErrorClassification for std::io::Error {
    fn is_retryable(&self) -> bool {
        use std::io::ErrorKind;

        matches!(
            self.kind(),
            ErrorKind::TimedOut
                | ErrorKind::Interrupted
                | ErrorKind::WouldBlock
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::ConnectionRefused
                | ErrorKind::BrokenPipe
        )
    }
}
