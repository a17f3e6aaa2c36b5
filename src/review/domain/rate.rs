//! Acceptance rate weighting factor.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive multiplicative weight applied to the review interval.
///
/// Larger values stretch the interval between reviews. The value is not a
/// probability and is not capped at one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AcceptanceRate(f64);

impl AcceptanceRate {
    /// Creates a validated acceptance rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAcceptanceRate`] when the value is
    /// zero, negative, infinite, or NaN.
    pub fn new(value: f64) -> Result<Self, TaskDomainError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TaskDomainError::InvalidAcceptanceRate(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying weight.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for AcceptanceRate {
    type Error = TaskDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AcceptanceRate> for f64 {
    fn from(value: AcceptanceRate) -> Self {
        value.0
    }
}

impl fmt::Display for AcceptanceRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
