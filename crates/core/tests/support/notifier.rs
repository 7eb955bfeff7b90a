use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tether_core::{NotificationMessage, Notifier, NotifyError};

/// In-memory mock for the `Notifier` port.
///
/// Keeps every message it was asked to deliver. When built with
/// [`RecordingNotifier::failing`], each delivery is recorded and then
/// reported as a 503 from the endpoint.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationMessage>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { sent: Arc::default(), fail: true }
    }

    /// Snapshot of the messages delivered so far
    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(NotifyError::Status { code: 503, body: "unavailable".into() });
        }
        Ok(())
    }
}
