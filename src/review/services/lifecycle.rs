//! Service layer for review task creation, update, removal and
//! acknowledgment.

use super::ReminderScheduler;
use crate::review::{
    domain::{
        AcceptanceRate, ArchivedTask, ChatId, MessageId, NewReviewTask, ReviewTask,
        TaskDomainError, TaskName, TaskState, parse_review_date,
    },
    ports::{ArchiveRepository, ReminderGateway, ReviewTaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for adding a review task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    chat_id: i64,
    name: String,
    last_review_date: String,
    acceptance_rate: f64,
}

impl CreateTaskRequest {
    /// Creates a request from raw command arguments.
    ///
    /// `last_review_date` is expected as `YYYY-MM-DD`.
    #[must_use]
    pub fn new(
        chat_id: i64,
        name: impl Into<String>,
        last_review_date: impl Into<String>,
        acceptance_rate: f64,
    ) -> Self {
        Self {
            chat_id,
            name: name.into(),
            last_review_date: last_review_date.into(),
            acceptance_rate,
        }
    }
}

/// Request payload for updating a review task.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTaskRequest {
    chat_id: i64,
    name: String,
    acceptance_rate: f64,
    last_review_date: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request changing the acceptance rate of a named task.
    #[must_use]
    pub fn new(chat_id: i64, name: impl Into<String>, acceptance_rate: f64) -> Self {
        Self {
            chat_id,
            name: name.into(),
            acceptance_rate,
            last_review_date: None,
        }
    }

    /// Also records a new last review date (`YYYY-MM-DD`).
    #[must_use]
    pub fn with_last_review_date(mut self, last_review_date: impl Into<String>) -> Self {
        self.last_review_date = Some(last_review_date.into());
        self
    }
}

/// Service-level errors for review lifecycle operations.
#[derive(Debug, Error)]
pub enum ReviewLifecycleError {
    /// Input validation or a state transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The chat already has a task with this name.
    #[error("chat {chat_id} already has a task named '{name}'")]
    NameTaken {
        /// Owning chat.
        chat_id: ChatId,
        /// Conflicting name.
        name: TaskName,
    },
    /// No task with this name exists in the chat.
    #[error("chat {chat_id} has no task named '{name}'")]
    TaskNotFound {
        /// Owning chat.
        chat_id: ChatId,
        /// Requested name.
        name: TaskName,
    },
    /// No reminded task in the chat carries this message identifier.
    #[error("chat {chat_id} has no pending reminder for message {message_id}")]
    UnknownMessage {
        /// Chat the acknowledgment arrived in.
        chat_id: ChatId,
        /// Acknowledged message.
        message_id: MessageId,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for review lifecycle service operations.
pub type ReviewLifecycleResult<T> = Result<T, ReviewLifecycleError>;

/// Review task lifecycle orchestration service.
///
/// Every mutating operation runs under the scheduler's dispatch gate, so a
/// reminder firing concurrently cannot interleave with it.
pub struct ReviewLifecycleService<R, A, G, C>
where
    R: ReviewTaskRepository,
    A: ArchiveRepository,
    G: ReminderGateway,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    archive: Arc<A>,
    scheduler: ReminderScheduler<R, G, C>,
    clock: Arc<C>,
}

impl<R, A, G, C> ReviewLifecycleService<R, A, G, C>
where
    R: ReviewTaskRepository + 'static,
    A: ArchiveRepository,
    G: ReminderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a lifecycle service and the scheduler it drives.
    #[must_use]
    pub fn new(repository: Arc<R>, archive: Arc<A>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        let scheduler =
            ReminderScheduler::new(Arc::clone(&repository), gateway, Arc::clone(&clock));
        Self {
            repository,
            archive,
            scheduler,
            clock,
        }
    }

    /// Returns the scheduler, e.g. to run a sweep on demand.
    #[must_use]
    pub const fn scheduler(&self) -> &ReminderScheduler<R, G, C> {
        &self.scheduler
    }

    /// Adds a task, computes its review date and schedules its reminder.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLifecycleError::Domain`] for malformed input,
    /// [`ReviewLifecycleError::NameTaken`] when the name is in use, or
    /// repository errors.
    pub async fn create_task(&self, request: CreateTaskRequest) -> ReviewLifecycleResult<ReviewTask> {
        let chat_id = ChatId::new(request.chat_id);
        let name = TaskName::new(request.name)?;
        let last_review_date = parse_review_date(&request.last_review_date)?;
        let acceptance_rate = AcceptanceRate::new(request.acceptance_rate)?;

        let _gate = self.scheduler.exclusive().await;
        if self.repository.find_by_name(chat_id, &name).await?.is_some() {
            return Err(ReviewLifecycleError::NameTaken { chat_id, name });
        }

        let task = ReviewTask::new(
            NewReviewTask {
                chat_id,
                name,
                last_review_date,
                acceptance_rate,
            },
            &*self.clock,
        )?;
        self.repository
            .store(&task)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::DuplicateName {
                    chat_id: owner,
                    name: taken,
                } => ReviewLifecycleError::NameTaken {
                    chat_id: owner,
                    name: taken,
                },
                other => ReviewLifecycleError::Repository(other),
            })?;
        self.scheduler.schedule(task.id(), task.due_at());

        info!(
            task_id = %task.id(),
            %chat_id,
            next_review_date = %task.next_review_date(),
            "review task created"
        );
        Ok(task)
    }

    /// Changes a task's rate (and optionally its last review date), moving it
    /// back to active with a fresh timer.
    ///
    /// Any outstanding reminder is forgotten: acknowledging its message
    /// afterwards fails with [`ReviewLifecycleError::UnknownMessage`].
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLifecycleError::TaskNotFound`] for unknown names,
    /// [`ReviewLifecycleError::Domain`] for malformed input, or repository
    /// errors.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> ReviewLifecycleResult<ReviewTask> {
        let chat_id = ChatId::new(request.chat_id);
        let name = TaskName::new(request.name)?;
        let acceptance_rate = AcceptanceRate::new(request.acceptance_rate)?;
        let last_review_date = request
            .last_review_date
            .as_deref()
            .map(parse_review_date)
            .transpose()?;

        let _gate = self.scheduler.exclusive().await;
        let mut task = self.find_existing(chat_id, name).await?;
        task.reschedule(acceptance_rate, last_review_date, &*self.clock)?;

        self.scheduler.cancel(task.id());
        self.repository.update(&task).await?;
        self.scheduler.schedule(task.id(), task.due_at());

        info!(
            task_id = %task.id(),
            %chat_id,
            next_review_date = %task.next_review_date(),
            "review task updated"
        );
        Ok(task)
    }

    /// Deletes a task without archiving it.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLifecycleError::TaskNotFound`] for unknown names or
    /// repository errors.
    pub async fn delete_task(&self, chat_id: ChatId, name: &str) -> ReviewLifecycleResult<()> {
        let task_name = TaskName::new(name)?;

        let _gate = self.scheduler.exclusive().await;
        let task = self.find_existing(chat_id, task_name).await?;
        self.scheduler.cancel(task.id());
        self.repository.delete(task.id()).await?;

        info!(task_id = %task.id(), %chat_id, "review task deleted");
        Ok(())
    }

    /// Deletes every task of a chat and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn delete_all_tasks(&self, chat_id: ChatId) -> ReviewLifecycleResult<usize> {
        let _gate = self.scheduler.exclusive().await;
        for task in self.repository.find_all(chat_id).await? {
            self.scheduler.cancel(task.id());
        }
        let removed = self.repository.delete_all(chat_id).await?;

        info!(%chat_id, removed, "review tasks deleted");
        Ok(removed)
    }

    /// Lists a chat's tasks by next review date, then name.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_tasks(&self, chat_id: ChatId) -> ReviewLifecycleResult<Vec<ReviewTask>> {
        let mut tasks = self.repository.find_all(chat_id).await?;
        tasks.sort_by(|left, right| {
            left.next_review_date()
                .cmp(&right.next_review_date())
                .then_with(|| left.name().cmp(right.name()))
        });
        Ok(tasks)
    }

    /// Looks up a task by name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLifecycleError::Domain`] for a blank name or
    /// repository errors.
    pub async fn find_task(
        &self,
        chat_id: ChatId,
        name: &str,
    ) -> ReviewLifecycleResult<Option<ReviewTask>> {
        let task_name = TaskName::new(name)?;
        Ok(self.repository.find_by_name(chat_id, &task_name).await?)
    }

    /// Completes the chat's task whose reminder carried `message_id`.
    ///
    /// The task is archived and removed from the active store. An archive
    /// entry left by an earlier, interrupted acknowledgment is reused.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLifecycleError::UnknownMessage`] when no reminded task
    /// in the chat matches, or repository errors.
    pub async fn acknowledge(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> ReviewLifecycleResult<ArchivedTask> {
        let _gate = self.scheduler.exclusive().await;
        let Some(mut task) = self
            .repository
            .find_by_message_id(chat_id, message_id)
            .await?
            .filter(|task| task.state() == TaskState::Reminded)
        else {
            return Err(ReviewLifecycleError::UnknownMessage {
                chat_id,
                message_id,
            });
        };

        let completed = task.complete(&*self.clock)?;
        self.scheduler.cancel(task.id());
        let archived = self.archive_once(completed).await?;
        self.repository.delete(task.id()).await?;

        info!(task_id = %task.id(), %chat_id, %message_id, "review task completed");
        Ok(archived)
    }

    /// Lists a chat's completed tasks, oldest completion first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_archived(&self, chat_id: ChatId) -> ReviewLifecycleResult<Vec<ArchivedTask>> {
        let mut archived = self.archive.find_all(chat_id).await?;
        archived.sort_by_key(ArchivedTask::archived_at);
        Ok(archived)
    }

    async fn archive_once(&self, archived: ArchivedTask) -> ReviewLifecycleResult<ArchivedTask> {
        match self.archive.store(&archived).await {
            Ok(()) => Ok(archived),
            Err(TaskRepositoryError::DuplicateArchive(task_id)) => {
                match self.archive.find_by_id(task_id).await? {
                    Some(existing) => {
                        warn!(%task_id, "reusing archive entry from an earlier acknowledgment");
                        Ok(existing)
                    }
                    None => Err(TaskRepositoryError::DuplicateArchive(task_id).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_existing(
        &self,
        chat_id: ChatId,
        name: TaskName,
    ) -> ReviewLifecycleResult<ReviewTask> {
        match self.repository.find_by_name(chat_id, &name).await? {
            Some(task) => Ok(task),
            None => Err(ReviewLifecycleError::TaskNotFound { chat_id, name }),
        }
    }
}
