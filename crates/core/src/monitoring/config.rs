//! Validated notifier configuration

use tether_domain::{NotifierPlatform, NotifierSettings};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Where and how notifications are delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    platform: NotifierPlatform,
    endpoint: Url,
}

impl NotifierConfig {
    /// Parse and validate a webhook endpoint
    ///
    /// Only absolute `http`/`https` URLs are accepted.
    pub fn new(platform: NotifierPlatform, endpoint: &str) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint { url: endpoint.to_string(), reason };

        let url = Url::parse(endpoint).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self { platform, endpoint: url })
    }

    pub fn platform(&self) -> NotifierPlatform {
        self.platform
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TryFrom<&NotifierSettings> for NotifierConfig {
    type Error = ConfigError;

    fn try_from(settings: &NotifierSettings) -> ConfigResult<Self> {
        Self::new(settings.platform, &settings.webhook_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_endpoint() {
        let config = NotifierConfig::new(NotifierPlatform::Discord, "https://discord.com/api/webhooks/1/abc")
            .expect("valid endpoint");

        assert_eq!(config.platform(), NotifierPlatform::Discord);
        assert_eq!(config.endpoint().host_str(), Some("discord.com"));
    }

    #[test]
    fn test_rejects_unusable_endpoints() {
        for endpoint in ["not a url", "ftp://example.com/hook", "/relative/path"] {
            let result = NotifierConfig::new(NotifierPlatform::Teams, endpoint);
            assert!(
                matches!(result, Err(ConfigError::InvalidEndpoint { ref url, .. }) if url == endpoint),
                "{endpoint} should be rejected"
            );
        }
    }

    #[test]
    fn test_try_from_settings() {
        let settings = NotifierSettings {
            platform: NotifierPlatform::Teams,
            webhook_url: "http://localhost:8080/hook".into(),
            timeout: None,
        };

        let config = NotifierConfig::try_from(&settings).expect("valid settings");
        assert_eq!(config.endpoint().as_str(), "http://localhost:8080/hook");
    }
}
