//! `PostgreSQL` repositories for active and archived review tasks.

use super::{
    models::{ArchivedTaskRow, NewReviewTaskRow, ReviewTaskChangeset, ReviewTaskRow},
    schema::{archived_review_tasks, review_tasks},
};
use crate::review::{
    domain::{
        AcceptanceRate, ArchivedTask, ChatId, MessageId, PersistedArchivedTaskData,
        PersistedReviewTaskData, ReviewTask, TaskId, TaskName, TaskState,
    },
    ports::{ArchiveRepository, ReviewTaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by review adapters.
pub type ReviewPgPool = Pool<ConnectionManager<PgConnection>>;

const CHAT_NAME_UNIQUE_INDEX: &str = "idx_review_tasks_chat_name_unique";

/// DDL creating the review tables and their indexes. Idempotent.
pub const CREATE_REVIEW_TABLES_SQL: &str =
    include_str!("../../../../migrations/2026-10-16-000000_create_review_tasks/up.sql");

/// Creates the review tables if they do not exist yet.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when the connection or the
/// DDL fails.
pub async fn apply_schema(pool: &ReviewPgPool) -> TaskRepositoryResult<()> {
    run_blocking(pool, |connection| {
        connection
            .batch_execute(CREATE_REVIEW_TABLES_SQL)
            .map_err(TaskRepositoryError::persistence)
    })
    .await
}

async fn run_blocking<F, T>(pool: &ReviewPgPool, f: F) -> TaskRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(TaskRepositoryError::persistence)?
}

/// `PostgreSQL`-backed active task repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewTaskRepository {
    pool: ReviewPgPool,
}

impl PostgresReviewTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }

    async fn load_many<F>(&self, query: F) -> TaskRepositoryResult<Vec<ReviewTask>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<ReviewTaskRow>> + Send + 'static,
    {
        run_blocking(&self.pool, move |connection| {
            let rows = query(connection).map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn load_one<F>(&self, query: F) -> TaskRepositoryResult<Option<ReviewTask>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<ReviewTaskRow> + Send + 'static,
    {
        run_blocking(&self.pool, move |connection| {
            let row = query(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }
}

#[async_trait]
impl ReviewTaskRepository for PostgresReviewTaskRepository {
    async fn store(&self, task: &ReviewTask) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let chat_id = task.chat_id();
        let name = task.name().clone();
        let new_row = to_new_row(task);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(review_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_chat_name_unique_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::DuplicateName {
                            chat_id,
                            name: name.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &ReviewTask) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(review_tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ReviewTask>> {
        self.load_one(move |connection| {
            review_tasks::table
                .find(id.into_inner())
                .select(ReviewTaskRow::as_select())
                .first(connection)
        })
        .await
    }

    async fn find_by_name(
        &self,
        chat_id: ChatId,
        name: &TaskName,
    ) -> TaskRepositoryResult<Option<ReviewTask>> {
        let lookup_name = name.as_str().to_owned();
        self.load_one(move |connection| {
            review_tasks::table
                .filter(review_tasks::chat_id.eq(chat_id.value()))
                .filter(review_tasks::name.eq(lookup_name))
                .select(ReviewTaskRow::as_select())
                .first(connection)
        })
        .await
    }

    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ReviewTask>> {
        self.load_many(move |connection| {
            review_tasks::table
                .filter(review_tasks::chat_id.eq(chat_id.value()))
                .order((review_tasks::next_review_date.asc(), review_tasks::name.asc()))
                .select(ReviewTaskRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_message_id(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> TaskRepositoryResult<Option<ReviewTask>> {
        self.load_one(move |connection| {
            review_tasks::table
                .filter(review_tasks::chat_id.eq(chat_id.value()))
                .filter(review_tasks::message_id.eq(message_id.value()))
                .select(ReviewTaskRow::as_select())
                .first(connection)
        })
        .await
    }

    async fn find_due(&self, date: NaiveDate) -> TaskRepositoryResult<Vec<ReviewTask>> {
        self.load_many(move |connection| {
            review_tasks::table
                .filter(review_tasks::state.eq(TaskState::Active.as_str()))
                .filter(review_tasks::next_review_date.le(date))
                .order(review_tasks::next_review_date.asc())
                .select(ReviewTaskRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_active(&self) -> TaskRepositoryResult<Vec<ReviewTask>> {
        self.load_many(move |connection| {
            review_tasks::table
                .filter(review_tasks::state.eq(TaskState::Active.as_str()))
                .select(ReviewTaskRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(review_tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_all(&self, chat_id: ChatId) -> TaskRepositoryResult<usize> {
        run_blocking(&self.pool, move |connection| {
            diesel::delete(review_tasks::table.filter(review_tasks::chat_id.eq(chat_id.value())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

/// `PostgreSQL`-backed archive repository.
#[derive(Debug, Clone)]
pub struct PostgresArchiveRepository {
    pool: ReviewPgPool,
}

impl PostgresArchiveRepository {
    /// Creates a new archive repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArchiveRepository for PostgresArchiveRepository {
    async fn store(&self, archived: &ArchivedTask) -> TaskRepositoryResult<()> {
        let task_id = archived.id();
        let row = to_archived_row(archived);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(archived_review_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateArchive(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<ArchivedTask>> {
        run_blocking(&self.pool, move |connection| {
            let row = archived_review_tasks::table
                .find(id.into_inner())
                .select(ArchivedTaskRow::as_select())
                .first(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_archived).transpose()
        })
        .await
    }

    async fn find_all(&self, chat_id: ChatId) -> TaskRepositoryResult<Vec<ArchivedTask>> {
        run_blocking(&self.pool, move |connection| {
            let rows = archived_review_tasks::table
                .filter(archived_review_tasks::chat_id.eq(chat_id.value()))
                .order(archived_review_tasks::archived_at.asc())
                .select(ArchivedTaskRow::as_select())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_archived).collect()
        })
        .await
    }
}

fn to_new_row(task: &ReviewTask) -> NewReviewTaskRow {
    NewReviewTaskRow {
        id: task.id().into_inner(),
        chat_id: task.chat_id().value(),
        name: task.name().as_str().to_owned(),
        last_review_date: task.last_review_date(),
        acceptance_rate: task.acceptance_rate().value(),
        next_review_date: task.next_review_date(),
        state: task.state().as_str().to_owned(),
        message_id: task.message_id().map(MessageId::value),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &ReviewTask) -> ReviewTaskChangeset {
    ReviewTaskChangeset {
        last_review_date: task.last_review_date(),
        acceptance_rate: task.acceptance_rate().value(),
        next_review_date: task.next_review_date(),
        state: task.state().as_str().to_owned(),
        message_id: task.message_id().map(MessageId::value),
        updated_at: task.updated_at(),
    }
}

fn to_archived_row(archived: &ArchivedTask) -> ArchivedTaskRow {
    ArchivedTaskRow {
        id: archived.id().into_inner(),
        chat_id: archived.chat_id().value(),
        name: archived.name().as_str().to_owned(),
        last_review_date: archived.last_review_date(),
        acceptance_rate: archived.acceptance_rate().value(),
        next_review_date: archived.next_review_date(),
        message_id: archived.message_id().map(MessageId::value),
        created_at: archived.created_at(),
        archived_at: archived.archived_at(),
    }
}

fn row_to_task(row: ReviewTaskRow) -> TaskRepositoryResult<ReviewTask> {
    let state = TaskState::try_from(row.state.as_str()).map_err(TaskRepositoryError::persistence)?;
    let data = PersistedReviewTaskData {
        id: TaskId::from_uuid(row.id),
        chat_id: ChatId::new(row.chat_id),
        name: TaskName::new(row.name).map_err(TaskRepositoryError::persistence)?,
        last_review_date: row.last_review_date,
        acceptance_rate: AcceptanceRate::new(row.acceptance_rate)
            .map_err(TaskRepositoryError::persistence)?,
        next_review_date: row.next_review_date,
        state,
        message_id: row.message_id.map(MessageId::new),
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    ReviewTask::from_persisted(data).map_err(TaskRepositoryError::persistence)
}

fn row_to_archived(row: ArchivedTaskRow) -> TaskRepositoryResult<ArchivedTask> {
    let data = PersistedArchivedTaskData {
        id: TaskId::from_uuid(row.id),
        chat_id: ChatId::new(row.chat_id),
        name: TaskName::new(row.name).map_err(TaskRepositoryError::persistence)?,
        last_review_date: row.last_review_date,
        acceptance_rate: AcceptanceRate::new(row.acceptance_rate)
            .map_err(TaskRepositoryError::persistence)?,
        next_review_date: row.next_review_date,
        message_id: row.message_id.map(MessageId::new),
        created_at: row.created_at,
        archived_at: row.archived_at,
    };
    Ok(ArchivedTask::from_persisted(data))
}

fn is_chat_name_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == CHAT_NAME_UNIQUE_INDEX)
}
