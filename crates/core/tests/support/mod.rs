//! Shared test helpers for `tether-core` integration tests.

pub mod notifier;
