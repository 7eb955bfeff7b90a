//! Harness assembly from loaded configuration

use tether_core::{Harness, RateLimitConfig, RetryConfig};
use tether_domain::{HarnessConfig, Result, TetherError};
use tracing::info;

use crate::notifiers::build_notifier_from_settings;

/// Validate `config` and build the matching [`Harness`]
///
/// Retry is always enabled with `policy`; the limiter and the monitoring
/// layer are added only when their sections are present.
///
/// # Errors
/// Returns `TetherError::Config` if any section fails validation or the
/// webhook client cannot be built.
pub fn build_harness<P>(config: &HarnessConfig, policy: P) -> Result<Harness<P>> {
    let retry = RetryConfig::try_from(&config.retry).map_err(TetherError::from)?;
    let mut builder = Harness::builder().retry(retry, policy);

    if let Some(settings) = &config.rate_limit {
        let rate_limit = RateLimitConfig::try_from(settings).map_err(TetherError::from)?;
        builder = builder.rate_limit(rate_limit);
    }

    if let Some(settings) = &config.notifier {
        builder = builder.notifier(build_notifier_from_settings(settings)?);
    }

    info!(
        max_attempts = config.retry.max_attempts,
        rate_limited = config.rate_limit.is_some(),
        notifier = config.notifier.as_ref().map(|n| n.platform.as_str()),
        "harness assembled"
    );

    Ok(builder.build())
}
