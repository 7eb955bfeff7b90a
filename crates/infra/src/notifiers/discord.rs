//! Discord webhook notifier

use async_trait::async_trait;
use serde::Serialize;
use tether_core::{NotificationMessage, Notifier, NotifyError};
use tracing::debug;
use url::Url;

use crate::http::WebhookClient;

/// Discord webhook body
#[derive(Debug, Serialize)]
pub(crate) struct DiscordPayload<'a> {
    pub content: &'a str,
}

/// Posts notifications to a Discord webhook
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: WebhookClient,
    endpoint: Url,
}

impl DiscordNotifier {
    pub fn new(client: WebhookClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let text = message.render();
        debug!(operation = %message.operation_name, "sending Discord notification");
        self.client.post_json(&self.endpoint, &DiscordPayload { content: &text }).await
    }
}
