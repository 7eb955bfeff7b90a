//! Webhook notifier adapters for the core `Notifier` port
//!
//! - [`DiscordNotifier`]: posts `{"content": text}`
//! - [`TeamsNotifier`]: posts the text inside an Adaptive Card envelope
//! - [`build_notifier`]: picks the adapter for a configured platform

pub mod discord;
pub mod factory;
pub mod teams;

pub use discord::DiscordNotifier;
pub use factory::{build_notifier, build_notifier_from_settings, build_notifier_with_client};
pub use teams::TeamsNotifier;
