//! Time utilities
//!
//! - **[`format`]**: elapsed-time breakdown rendered in notifications

pub mod format;

pub use format::{format_elapsed, ElapsedBreakdown};
