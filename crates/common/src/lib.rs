//! Modular common utilities shared across Tether crates.
//!
//! # Safety and Quality
//!
//! This crate is free of I/O. Everything in it is either a pure helper or a
//! small abstraction the resilience core is generic over.
//!
//! # Contents
//!
//! - [`clock`]: time source abstraction (`Clock`, `RuntimeClock`, `MockClock`)
//! - [`error`]: error classification shared by retry policies
//! - [`time`]: elapsed-time breakdown used in notifications
//! - [`utils`]: serde helpers
//! - `testing`: assertion helpers (behind the `test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod clock;
pub mod error;
pub mod time;
pub mod utils;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use clock::{Clock, MockClock, RuntimeClock};
pub use error::ErrorClassification;
pub use time::{format_elapsed, ElapsedBreakdown};
pub use utils::serde::{duration_millis, optional_duration_millis};
