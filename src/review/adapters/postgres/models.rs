//! Diesel row models for review task persistence.

use super::schema::{archived_review_tasks, review_tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for active tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = review_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning chat identifier.
    pub chat_id: i64,
    /// Task name.
    pub name: String,
    /// Date of the most recent review.
    pub last_review_date: NaiveDate,
    /// Interval weighting factor.
    pub acceptance_rate: f64,
    /// Derived next review date.
    pub next_review_date: NaiveDate,
    /// Lifecycle state.
    pub state: String,
    /// Reminder message identifier.
    pub message_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for active tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = review_tasks)]
pub struct NewReviewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning chat identifier.
    pub chat_id: i64,
    /// Task name.
    pub name: String,
    /// Date of the most recent review.
    pub last_review_date: NaiveDate,
    /// Interval weighting factor.
    pub acceptance_rate: f64,
    /// Derived next review date.
    pub next_review_date: NaiveDate,
    /// Lifecycle state.
    pub state: String,
    /// Reminder message identifier.
    pub message_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by updates.
///
/// `message_id` must be nulled when a task returns to active.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = review_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct ReviewTaskChangeset {
    /// Date of the most recent review.
    pub last_review_date: NaiveDate,
    /// Interval weighting factor.
    pub acceptance_rate: f64,
    /// Derived next review date.
    pub next_review_date: NaiveDate,
    /// Lifecycle state.
    pub state: String,
    /// Reminder message identifier.
    pub message_id: Option<i64>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for archive records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = archived_review_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArchivedTaskRow {
    /// Identifier of the original task.
    pub id: uuid::Uuid,
    /// Owning chat identifier.
    pub chat_id: i64,
    /// Task name.
    pub name: String,
    /// Last review date at completion.
    pub last_review_date: NaiveDate,
    /// Acceptance rate at completion.
    pub acceptance_rate: f64,
    /// Review date of the acknowledged reminder.
    pub next_review_date: NaiveDate,
    /// Acknowledged reminder message identifier.
    pub message_id: Option<i64>,
    /// Creation timestamp of the original task.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub archived_at: DateTime<Utc>,
}
