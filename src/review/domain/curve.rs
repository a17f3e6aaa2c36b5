//! Exponential forgetting-curve model for review intervals.
//!
//! Retention decays as `exp(-k · days)` with a fixed `k`. The next interval is
//! the inverse of the current retention scaled by the task's acceptance rate,
//! so overdue tasks are pushed further out once reviewed.

use super::{AcceptanceRate, TaskDomainError};
use chrono::{Days, NaiveDate};

/// Decay constant `k` of the forgetting curve.
pub const DECAY_CONSTANT: f64 = 0.1;

/// Returns the retained fraction after `days_elapsed` days.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "the curve is defined over reals")]
pub fn decay(days_elapsed: u32) -> f64 {
    (-DECAY_CONSTANT * f64::from(days_elapsed)).exp()
}

/// Returns the whole number of days until the next review.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "the curve is defined over reals")]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the floored interval is non-negative and saturates at u64::MAX"
)]
pub fn interval_days(days_elapsed: u32, rate: AcceptanceRate) -> u64 {
    ((1.0 / decay(days_elapsed)) * rate.value()).floor() as u64
}

/// Whole days from `last_review_date` to `today`, clamped at zero.
#[must_use]
pub fn days_elapsed(last_review_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = today.signed_duration_since(last_review_date).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Computes the next review date.
///
/// A `last_review_date` after `today` counts as zero elapsed days.
///
/// # Errors
///
/// Returns [`TaskDomainError::ReviewDateOutOfRange`] when the interval
/// overflows the calendar.
pub fn next_review_date(
    last_review_date: NaiveDate,
    rate: AcceptanceRate,
    today: NaiveDate,
) -> Result<NaiveDate, TaskDomainError> {
    let interval = interval_days(days_elapsed(last_review_date, today), rate);
    last_review_date
        .checked_add_days(Days::new(interval))
        .ok_or(TaskDomainError::ReviewDateOutOfRange)
}
