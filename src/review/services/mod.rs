//! Application services for review scheduling.

mod config;
mod lifecycle;
mod scheduler;

pub use config::{DEFAULT_SWEEP_HOUR, SchedulerConfig, SchedulerConfigError};
pub use lifecycle::{
    CreateTaskRequest, ReviewLifecycleError, ReviewLifecycleResult, ReviewLifecycleService,
    UpdateTaskRequest,
};
pub use scheduler::{
    DispatchOutcome, ReminderScheduler, SchedulerError, SchedulerResult, SweepReport,
    next_sweep_at, reminder_text,
};
