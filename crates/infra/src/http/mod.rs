//! HTTP client for webhook delivery

pub mod client;

pub use client::{WebhookClient, WebhookClientBuilder};
