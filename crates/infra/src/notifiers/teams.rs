//! Microsoft Teams webhook notifier
//!
//! Teams incoming webhooks expect a `message` with an Adaptive Card
//! attachment; the notification text goes into a single wrapping
//! `TextBlock`.

use async_trait::async_trait;
use serde::Serialize;
use tether_core::{NotificationMessage, Notifier, NotifyError};
use tracing::debug;
use url::Url;

use crate::http::WebhookClient;

const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.4";

#[derive(Debug, Serialize)]
pub(crate) struct TeamsPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attachments: [Attachment<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Attachment<'a> {
    content_type: &'static str,
    content_url: Option<&'a str>,
    content: AdaptiveCard<'a>,
}

#[derive(Debug, Serialize)]
struct AdaptiveCard<'a> {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    version: &'static str,
    body: [TextBlock<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    wrap: bool,
}

impl<'a> TeamsPayload<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            kind: "message",
            attachments: [Attachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE,
                content_url: None,
                content: AdaptiveCard {
                    schema: ADAPTIVE_CARD_SCHEMA,
                    kind: "AdaptiveCard",
                    version: ADAPTIVE_CARD_VERSION,
                    body: [TextBlock { kind: "TextBlock", text, wrap: true }],
                },
            }],
        }
    }
}

/// Posts notifications to a Teams incoming webhook
#[derive(Debug, Clone)]
pub struct TeamsNotifier {
    client: WebhookClient,
    endpoint: Url,
}

impl TeamsNotifier {
    pub fn new(client: WebhookClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for TeamsNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let text = message.render();
        debug!(operation = %message.operation_name, "sending Teams notification");
        self.client.post_json(&self.endpoint, &TeamsPayload::new(&text)).await
    }
}
