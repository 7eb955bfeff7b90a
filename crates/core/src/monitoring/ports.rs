//! Port interfaces for notification delivery

use std::sync::Arc;

use async_trait::async_trait;
use tether_domain::TetherError;
use thiserror::Error;

use super::message::NotificationMessage;

/// Boxed error type for transport failures raised by adapters
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("notification transport failed: {source}")]
    Transport {
        #[source]
        source: BoxedError,
    },

    /// The endpoint answered with a non-success status
    #[error("notification endpoint returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// The payload could not be encoded
    #[error("failed to encode notification payload: {0}")]
    Serialization(String),
}

impl NotifyError {
    pub fn transport(source: impl Into<BoxedError>) -> Self {
        Self::Transport { source: source.into() }
    }
}

impl From<NotifyError> for TetherError {
    fn from(err: NotifyError) -> Self {
        TetherError::Notification(err.to_string())
    }
}

/// Trait for delivering notification messages to an external sink
///
/// Implementations perform a single delivery attempt; callers decide what a
/// failure means.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        (**self).send(message).await
    }
}

/// Notifier that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _message: &NotificationMessage) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_noop_notifier_accepts_everything() {
        let notifier: Arc<dyn Notifier> = Arc::new(NoopNotifier);
        let message = NotificationMessage::success("noop", Duration::from_millis(5));

        assert!(notifier.send(&message).await.is_ok());
    }

    #[test]
    fn test_notify_error_display() {
        let status = NotifyError::Status { code: 429, body: "slow down".into() };
        assert_eq!(status.to_string(), "notification endpoint returned status 429: slow down");

        let transport = NotifyError::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(transport.to_string().contains("refused"));
        assert!(std::error::Error::source(&transport).is_some());
    }

    #[test]
    fn test_notify_error_into_tether_error() {
        let err: TetherError = NotifyError::Status { code: 404, body: "unknown webhook".into() }.into();

        assert_eq!(
            err,
            TetherError::Notification("notification endpoint returned status 404: unknown webhook".into())
        );
    }
}
