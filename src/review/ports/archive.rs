//! Archive port for completed review tasks.

use super::TaskRepositoryResult;
use crate::review::domain::{ArchivedTask, ChatId, TaskId};
use async_trait::async_trait;

/// Append-only store of completed tasks.
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Stores an archive record.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskRepositoryError::DuplicateArchive`] when the task
    /// was archived before.
    async fn store(&self, archived: &ArchivedTask) -> TaskRepositoryResult<()>;

    /// Finds the archive record of a task.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ArchivedTask>>;

    /// Returns every archive record of a chat.
    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ArchivedTask>>;
}
