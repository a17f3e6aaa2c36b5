//! In-memory archive of completed review tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::review::{
    domain::{ArchivedTask, ChatId, TaskId},
    ports::{ArchiveRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory archive.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchiveRepository {
    records: Arc<RwLock<HashMap<TaskId, ArchivedTask>>>,
}

impl InMemoryArchiveRepository {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ArchiveRepository for InMemoryArchiveRepository {
    async fn store(&self, archived: &ArchivedTask) -> TaskRepositoryResult<()> {
        let mut records = self.records.write().map_err(|err| poisoned(&err))?;
        if records.contains_key(&archived.id()) {
            return Err(TaskRepositoryError::DuplicateArchive(archived.id()));
        }
        records.insert(archived.id(), archived.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ArchivedTask>> {
        let records = self.records.read().map_err(|err| poisoned(&err))?;
        Ok(records.get(&id).cloned())
    }

    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ArchivedTask>> {
        let records = self.records.read().map_err(|err| poisoned(&err))?;
        Ok(records
            .values()
            .filter(|record| record.chat_id() == chat_id)
            .cloned()
            .collect())
    }
}
