//! Custom assertions for testing
//!
//! Provides assertion macros and functions for common testing scenarios.

// These assertions are designed to panic on failure; that is their purpose
#![allow(clippy::missing_panics_doc)]

use std::time::Duration;

/// Assert that an error's `Display` output contains a specific substring
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// let result: Result<(), String> = Err("Connection timeout occurred".to_string());
/// tether_common::assert_error_contains!(result, "timeout");
/// # }
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that a duration is within an acceptable range
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use std::time::Duration;
///
/// use tether_common::testing::assertions::assert_duration_in_range;
///
/// let actual = Duration::from_millis(105);
/// assert_duration_in_range(actual, Duration::from_millis(100), Duration::from_millis(10));
/// # }
/// ```
pub fn assert_duration_in_range(actual: Duration, expected: Duration, tolerance: Duration) {
    let min = expected.saturating_sub(tolerance);
    let max = expected + tolerance;

    assert!(
        actual >= min && actual <= max,
        "Duration {:?} not in range [{:?}, {:?}]",
        actual,
        min,
        max
    );
}

/// Assert that a duration is at least `minimum`
///
/// Waits are lower-bounded by the scheduler, never upper-bounded, so most
/// timing assertions only care about this side.
pub fn assert_duration_at_least(actual: Duration, minimum: Duration) {
    assert!(actual >= minimum, "Duration {:?} shorter than expected minimum {:?}", actual, minimum);
}
