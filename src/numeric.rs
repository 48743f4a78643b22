//! Numeric conversion helpers used across the project.
//!
//! Configuration speaks in `f32` seconds while the scheduler keeps exact
//! [`Duration`] values. These helpers guard the crossing between the two.

use std::time::Duration;

/// Convert seconds into a [`Duration`] rounded to whole milliseconds.
///
/// Negative and non-finite inputs collapse to [`Duration::ZERO`]. Rounding to
/// milliseconds keeps configured delays such as `0.1` exact when they are
/// summed tick after tick.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use komodo_guard::numeric::duration_from_seconds;
/// assert_eq!(duration_from_seconds(0.1), Duration::from_millis(100));
/// assert_eq!(duration_from_seconds(-3.0), Duration::ZERO);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is checked to be finite and non-negative before casting."
)]
#[must_use]
pub fn duration_from_seconds(seconds: f32) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    let millis = (f64::from(seconds) * 1000.0).round();
    if millis >= u64::MAX as f64 {
        return Duration::MAX;
    }
    Duration::from_millis(millis as u64)
}

/// Number of whole frames of length `step` needed to cover `seconds`.
///
/// Returns zero when `step` is zero.
#[must_use]
pub fn frames_to_cover(seconds: f32, step: Duration) -> u64 {
    let total = duration_from_seconds(seconds).as_millis();
    let step_millis = step.as_millis();
    if step_millis == 0 {
        return 0;
    }
    u64::try_from(total.div_ceil(step_millis)).unwrap_or(u64::MAX)
}
