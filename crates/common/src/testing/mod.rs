//! Testing utilities and helpers
//!
//! - **[`assertions`]**: duration and error-message assertions used by the
//!   timing-sensitive wrapper tests
//!
//! Enable the `test-utils` feature from a dev-dependency to use these from
//! another crate's tests.

pub mod assertions;

// Note: macros exported with #[macro_export] are available at crate root
pub use assertions::{assert_duration_at_least, assert_duration_in_range};
