//! # Tether Infrastructure
//!
//! Implementations of the core notifier port and everything else that
//! touches the outside world.
//!
//! This crate contains:
//! - The webhook HTTP client (`http`)
//! - Discord and Teams notifiers (`notifiers`)
//! - Configuration loading from env and TOML/JSON files (`config`)
//! - Harness assembly from configuration (`bootstrap`)
//! - Tracing subscriber setup (`observability`)
//!
//! ## Architecture
//! - Implements traits defined in `tether-core`
//! - Depends on `tether-common`, `tether-domain` and `tether-core`
//! - Contains all "impure" code (network, files, environment)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;
pub mod notifiers;
pub mod observability;

pub use bootstrap::build_harness;
pub use errors::InfraError;
pub use http::{WebhookClient, WebhookClientBuilder};
pub use notifiers::{
    build_notifier, build_notifier_from_settings, build_notifier_with_client, DiscordNotifier,
    TeamsNotifier,
};
pub use observability::{init_tracing, LogFormat, LoggingConfig};
