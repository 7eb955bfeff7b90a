//! Error conversions between infrastructure libraries and Tether errors

pub mod conversions;

pub use conversions::{notify_error_from_http, InfraError};
