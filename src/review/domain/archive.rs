//! Immutable record of a completed review task.

use super::{AcceptanceRate, ChatId, MessageId, ReviewTask, TaskId, TaskName};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a task taken when it reached `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedTask {
    id: TaskId,
    chat_id: ChatId,
    name: TaskName,
    last_review_date: NaiveDate,
    acceptance_rate: AcceptanceRate,
    next_review_date: NaiveDate,
    message_id: Option<MessageId>,
    created_at: DateTime<Utc>,
    archived_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted archive record.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedArchivedTaskData {
    /// Identifier of the original task.
    pub id: TaskId,
    /// Owning chat.
    pub chat_id: ChatId,
    /// Task name.
    pub name: TaskName,
    /// Last review date at completion.
    pub last_review_date: NaiveDate,
    /// Acceptance rate at completion.
    pub acceptance_rate: AcceptanceRate,
    /// Review date the acknowledged reminder was sent for.
    pub next_review_date: NaiveDate,
    /// Message identifier of the acknowledged reminder.
    pub message_id: Option<MessageId>,
    /// Creation timestamp of the original task.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub archived_at: DateTime<Utc>,
}

impl ArchivedTask {
    pub(super) fn snapshot(task: &ReviewTask, archived_at: DateTime<Utc>) -> Self {
        Self {
            id: task.id(),
            chat_id: task.chat_id(),
            name: task.name().clone(),
            last_review_date: task.last_review_date(),
            acceptance_rate: task.acceptance_rate(),
            next_review_date: task.next_review_date(),
            message_id: task.message_id(),
            created_at: task.created_at(),
            archived_at,
        }
    }

    /// Reconstructs an archive record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedArchivedTaskData) -> Self {
        Self {
            id: data.id,
            chat_id: data.chat_id,
            name: data.name,
            last_review_date: data.last_review_date,
            acceptance_rate: data.acceptance_rate,
            next_review_date: data.next_review_date,
            message_id: data.message_id,
            created_at: data.created_at,
            archived_at: data.archived_at,
        }
    }

    /// Returns the identifier of the original task.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning chat.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the last review date at completion.
    #[must_use]
    pub const fn last_review_date(&self) -> NaiveDate {
        self.last_review_date
    }

    /// Returns the acceptance rate at completion.
    #[must_use]
    pub const fn acceptance_rate(&self) -> AcceptanceRate {
        self.acceptance_rate
    }

    /// Returns the review date of the acknowledged reminder.
    #[must_use]
    pub const fn next_review_date(&self) -> NaiveDate {
        self.next_review_date
    }

    /// Returns the acknowledged reminder's message identifier.
    #[must_use]
    pub const fn message_id(&self) -> Option<MessageId> {
        self.message_id
    }

    /// Returns the creation timestamp of the original task.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn archived_at(&self) -> DateTime<Utc> {
        self.archived_at
    }
}
