//! Notifier selection by platform

use std::sync::Arc;

use tether_core::{Notifier, NotifierConfig};
use tether_domain::{NotifierPlatform, NotifierSettings, Result, TetherError};
use tracing::debug;

use super::{DiscordNotifier, TeamsNotifier};
use crate::http::WebhookClient;

/// Build the notifier for `config` with a default webhook client
///
/// # Errors
/// Returns `TetherError::Config` if the HTTP client cannot be constructed.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    Ok(build_notifier_with_client(config, WebhookClient::new()?))
}

/// Validate a notifier section and build its notifier
///
/// A configured `timeout_ms` replaces the client's default request timeout.
///
/// # Errors
/// Returns `TetherError::Config` for an unusable webhook URL or HTTP client.
pub fn build_notifier_from_settings(settings: &NotifierSettings) -> Result<Arc<dyn Notifier>> {
    let config = NotifierConfig::try_from(settings).map_err(TetherError::from)?;

    let mut builder = WebhookClient::builder();
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(build_notifier_with_client(&config, builder.build()?))
}

/// Build the notifier for `config` around an existing client
pub fn build_notifier_with_client(config: &NotifierConfig, client: WebhookClient) -> Arc<dyn Notifier> {
    let endpoint = config.endpoint().clone();
    debug!(platform = %config.platform(), host = endpoint.host_str().unwrap_or_default(), "building notifier");

    match config.platform() {
        NotifierPlatform::Discord => Arc::new(DiscordNotifier::new(client, endpoint)),
        NotifierPlatform::Teams => Arc::new(TeamsNotifier::new(client, endpoint)),
    }
}
