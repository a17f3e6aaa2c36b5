//! Domain model for spaced-repetition review tasks.
//!
//! The review domain covers interval computation, the task state machine and
//! the archive snapshot, with storage and delivery kept outside the boundary.

mod archive;
pub mod curve;
mod error;
mod ids;
mod rate;
mod task;

pub use archive::{ArchivedTask, PersistedArchivedTaskData};
pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::{
    ChatId, MAX_TASK_NAME_LENGTH, MessageId, REVIEW_DATE_FORMAT, TaskId, TaskName,
    parse_review_date,
};
pub use rate::AcceptanceRate;
pub use task::{NewReviewTask, PersistedReviewTaskData, ReviewTask, TaskState};
