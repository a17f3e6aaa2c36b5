//! In-memory repository for active review tasks.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::review::{
    domain::{ChatId, MessageId, ReviewTask, TaskId, TaskName, TaskState},
    ports::{ReviewTaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory review task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, ReviewTask>,
    name_index: HashMap<(ChatId, TaskName), TaskId>,
    message_index: HashMap<(ChatId, MessageId), TaskId>,
}

impl InMemoryTaskState {
    fn index(&mut self, task: &ReviewTask) {
        self.name_index
            .insert((task.chat_id(), task.name().clone()), task.id());
        if let Some(message_id) = task.message_id() {
            self.message_index
                .insert((task.chat_id(), message_id), task.id());
        }
    }

    fn unindex(&mut self, task: &ReviewTask) {
        self.name_index
            .remove(&(task.chat_id(), task.name().clone()));
        if let Some(message_id) = task.message_id() {
            self.message_index.remove(&(task.chat_id(), message_id));
        }
    }

    fn remove(&mut self, id: TaskId) -> Option<ReviewTask> {
        let task = self.tasks.remove(&id)?;
        self.unindex(&task);
        Some(task)
    }

    fn collect(&self, predicate: impl Fn(&ReviewTask) -> bool) -> Vec<ReviewTask> {
        self.tasks
            .values()
            .filter(|task| predicate(task))
            .cloned()
            .collect()
    }
}

impl InMemoryReviewTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ReviewTaskRepository for InMemoryReviewTaskRepository {
    async fn store(&self, task: &ReviewTask) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if state
            .name_index
            .contains_key(&(task.chat_id(), task.name().clone()))
        {
            return Err(TaskRepositoryError::DuplicateName {
                chat_id: task.chat_id(),
                name: task.name().clone(),
            });
        }

        state.index(task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &ReviewTask) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        // Drop stale name/message index entries before re-indexing.
        state
            .remove(task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        state.index(task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ReviewTask>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        chat_id: ChatId,
        name: &TaskName,
    ) -> TaskRepositoryResult<Option<ReviewTask>> {
        let state = self.read()?;
        let task = state
            .name_index
            .get(&(chat_id, name.clone()))
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ReviewTask>> {
        let state = self.read()?;
        Ok(state.collect(|task| task.chat_id() == chat_id))
    }

    async fn find_by_message_id(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> TaskRepositoryResult<Option<ReviewTask>> {
        let state = self.read()?;
        let task = state
            .message_index
            .get(&(chat_id, message_id))
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn find_due(&self, date: NaiveDate) -> TaskRepositoryResult<Vec<ReviewTask>> {
        let state = self.read()?;
        Ok(state.collect(|task| {
            task.state() == TaskState::Active && task.next_review_date() <= date
        }))
    }

    async fn find_active(&self) -> TaskRepositoryResult<Vec<ReviewTask>> {
        let state = self.read()?;
        Ok(state.collect(|task| task.state() == TaskState::Active))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .remove(id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn delete_all(&self, chat_id: ChatId) -> TaskRepositoryResult<usize> {
        let mut state = self.write()?;
        let owned: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.chat_id() == chat_id)
            .map(ReviewTask::id)
            .collect();
        for id in &owned {
            state.remove(*id);
        }
        Ok(owned.len())
    }
}
