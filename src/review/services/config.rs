//! Scheduler configuration.

use chrono::NaiveTime;
use thiserror::Error;

/// Hour of day (UTC) at which the catch-up sweep runs by default.
pub const DEFAULT_SWEEP_HOUR: u32 = 9;

/// Invalid scheduler settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerConfigError {
    /// The sweep hour is outside `0..24`.
    #[error("invalid sweep hour {0}, expected 0-23")]
    InvalidSweepHour(u32),
}

/// Settings for the reminder scheduler.
///
/// # Examples
///
/// ```
/// use revisit::review::services::SchedulerConfig;
///
/// let config = SchedulerConfig::default();
/// assert_eq!(config.sweep_time().to_string(), "09:00:00");
///
/// assert!(SchedulerConfig::with_sweep_hour(24).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    sweep_time: NaiveTime,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_time: NaiveTime::from_hms_opt(DEFAULT_SWEEP_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl SchedulerConfig {
    /// Creates a configuration sweeping daily at `hour:00` UTC.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerConfigError::InvalidSweepHour`] for hours above 23.
    pub fn with_sweep_hour(hour: u32) -> Result<Self, SchedulerConfigError> {
        let sweep_time =
            NaiveTime::from_hms_opt(hour, 0, 0).ok_or(SchedulerConfigError::InvalidSweepHour(hour))?;
        Ok(Self { sweep_time })
    }

    /// Returns the daily sweep time (UTC).
    #[must_use]
    pub const fn sweep_time(&self) -> NaiveTime {
        self.sweep_time
    }
}
