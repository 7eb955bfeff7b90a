//! Human-readable elapsed-time formatting
//!
//! Notifications report how long an operation ran as whole hours, minutes and
//! seconds followed by the exact total in seconds with two decimals, e.g.
//! `1 hours 1 minutes 5 seconds (3665.25 seconds)`.

use std::fmt;
use std::time::Duration;

/// Whole-unit decomposition of an elapsed duration.
///
/// Components are truncated, never rounded: `hours = secs / 3600`,
/// `minutes = (secs % 3600) / 60`, `seconds = secs % 60`, where `secs` is the
/// number of whole seconds in the duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedBreakdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Exact elapsed time in fractional seconds
    pub total_seconds: f64,
}

impl ElapsedBreakdown {
    pub fn from_duration(elapsed: Duration) -> Self {
        let secs = elapsed.as_secs();
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
            seconds: secs % 60,
            total_seconds: elapsed.as_secs_f64(),
        }
    }
}

impl From<Duration> for ElapsedBreakdown {
    fn from(elapsed: Duration) -> Self {
        Self::from_duration(elapsed)
    }
}

impl fmt::Display for ElapsedBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours {} minutes {} seconds ({:.2} seconds)",
            self.hours, self.minutes, self.seconds, self.total_seconds
        )
    }
}

/// Format an elapsed duration as `H hours M minutes S seconds (X.XX seconds)`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tether_common::time::format_elapsed;
///
/// assert_eq!(
///     format_elapsed(Duration::from_millis(65_500)),
///     "0 hours 1 minutes 5 seconds (65.50 seconds)"
/// );
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    ElapsedBreakdown::from_duration(elapsed).to_string()
}
