//! Error types for review task validation and parsing.

use super::{TaskId, TaskState};
use thiserror::Error;

/// Errors returned while constructing or transitioning review task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The acceptance rate is not a finite, strictly positive number.
    #[error("invalid acceptance rate {0}, expected a positive number")]
    InvalidAcceptanceRate(f64),

    /// The review date does not follow `YYYY-MM-DD`.
    #[error("invalid review date '{0}', expected YYYY-MM-DD")]
    InvalidReviewDate(String),

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name is longer than the stored column allows.
    #[error("task name has {0} characters, at most 255 are allowed")]
    TaskNameTooLong(usize),

    /// The computed review date falls outside the supported calendar range.
    #[error("next review date is out of range")]
    ReviewDateOutOfRange,

    /// A persisted record violates a task invariant.
    #[error("corrupt task record {task_id}: {reason}")]
    CorruptRecord {
        /// Task identifier of the offending record.
        task_id: TaskId,
        /// Violated invariant.
        reason: &'static str,
    },

    /// The requested state transition is not permitted.
    #[error("task {task_id} cannot transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current state.
        from: TaskState,
        /// Requested target state.
        to: TaskState,
    },
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
