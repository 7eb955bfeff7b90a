//! Conversions from external infrastructure errors into Tether errors.

use reqwest::Error as HttpError;
use tether_core::NotifyError;
use tether_domain::TetherError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the workspace error.
#[derive(Debug)]
pub struct InfraError(pub TetherError);

impl From<InfraError> for TetherError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TetherError> for InfraError {
    fn from(value: TetherError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TetherError */
/* -------------------------------------------------------------------------- */

fn describe_http_error(err: &HttpError) -> String {
    if err.is_timeout() {
        return "HTTP request timed out".into();
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return "HTTP connection failure".into();
    }

    if err.is_builder() {
        return format!("HTTP client configuration error: {err}");
    }

    if let Some(status) = err.status() {
        return format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        );
    }

    format!("HTTP error: {err}")
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let message = describe_http_error(&value);
        if value.is_builder() {
            return InfraError(TetherError::Config(message));
        }
        InfraError(TetherError::Network(message))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → NotifyError */
/* -------------------------------------------------------------------------- */

/// Map a delivery failure raised by reqwest onto the notifier port's error
///
/// Request encoding failures become `Serialization`; everything else is a
/// transport failure that keeps the reqwest error as its source.
pub fn notify_error_from_http(err: HttpError) -> NotifyError {
    if err.is_body() || err.is_decode() {
        return NotifyError::Serialization(err.to_string());
    }
    NotifyError::transport(err)
}
