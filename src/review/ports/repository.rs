//! Repository port for active review task persistence and lookup.

use crate::review::domain::{ChatId, MessageId, ReviewTask, TaskId, TaskName};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Active task persistence contract.
#[async_trait]
pub trait ReviewTaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::DuplicateName`] when the chat already
    /// has a task with the same name.
    async fn store(&self, task: &ReviewTask) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &ReviewTask) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ReviewTask>>;

    /// Finds a task by chat and name.
    async fn find_by_name(
        &self,
        chat_id: ChatId,
        name: &TaskName,
    ) -> TaskRepositoryResult<Option<ReviewTask>>;

    /// Returns every task owned by a chat.
    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ReviewTask>>;

    /// Finds the chat's task whose reminder carried the given message
    /// identifier.
    ///
    /// Message identifiers are only unique within a chat.
    async fn find_by_message_id(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> TaskRepositoryResult<Option<ReviewTask>>;

    /// Returns active tasks whose review date is on or before `date`.
    async fn find_due(&self, date: NaiveDate) -> TaskRepositoryResult<Vec<ReviewTask>>;

    /// Returns every active task across all chats.
    async fn find_active(&self) -> TaskRepositoryResult<Vec<ReviewTask>>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Removes every task owned by a chat and returns how many were removed.
    async fn delete_all(&self, chat_id: ChatId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task and archive repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The chat already has a task with this name.
    #[error("chat {chat_id} already has a task named '{name}'")]
    DuplicateName {
        /// Owning chat.
        chat_id: ChatId,
        /// Conflicting name.
        name: TaskName,
    },

    /// The task was already archived.
    #[error("task already archived: {0}")]
    DuplicateArchive(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
