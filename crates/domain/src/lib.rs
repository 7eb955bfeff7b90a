//! # Tether Domain
//!
//! Plain data types shared by the Tether crates.
//!
//! This crate contains:
//! - Configuration structures (serde DTOs for files and environment)
//! - The workspace error type and Result definition
//!
//! ## Architecture
//! - Depends only on `tether-common`
//! - No validation beyond what serde enforces; the core turns these DTOs
//!   into validated configs

pub mod config;
pub mod errors;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
