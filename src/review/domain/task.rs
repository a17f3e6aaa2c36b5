//! Review task aggregate root and its lifecycle state machine.

use super::{
    AcceptanceRate, ArchivedTask, ChatId, MessageId, ParseTaskStateError, TaskDomainError, TaskId,
    TaskName, curve,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Review task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting for its review date.
    Active,
    /// A reminder was delivered and awaits acknowledgment.
    Reminded,
    /// Acknowledged and archived.
    Done,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Reminded => "reminded",
            Self::Done => "done",
        }
    }

    /// Returns `true` if moving from `self` to `target` is permitted.
    ///
    /// `Active -> Active` and `Reminded -> Active` are the update transition;
    /// nothing leaves `Done`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active | Self::Reminded, Self::Active)
                | (Self::Active, Self::Reminded)
                | (Self::Reminded, Self::Done)
        )
    }

    /// Returns `true` for states with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "reminded" => Ok(Self::Reminded),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Validated input for a new review task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReviewTask {
    /// Owning chat.
    pub chat_id: ChatId,
    /// Task name.
    pub name: TaskName,
    /// Date the material was last reviewed.
    pub last_review_date: NaiveDate,
    /// Interval weighting factor.
    pub acceptance_rate: AcceptanceRate,
}

/// Review task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewTask {
    id: TaskId,
    chat_id: ChatId,
    name: TaskName,
    last_review_date: NaiveDate,
    acceptance_rate: AcceptanceRate,
    next_review_date: NaiveDate,
    state: TaskState,
    message_id: Option<MessageId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedReviewTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning chat.
    pub chat_id: ChatId,
    /// Persisted task name.
    pub name: TaskName,
    /// Persisted last review date.
    pub last_review_date: NaiveDate,
    /// Persisted acceptance rate.
    pub acceptance_rate: AcceptanceRate,
    /// Persisted next review date.
    pub next_review_date: NaiveDate,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Persisted reminder message identifier, if any.
    pub message_id: Option<MessageId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ReviewTask {
    /// Creates an active task and computes its first review date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ReviewDateOutOfRange`] when the computed
    /// date overflows the calendar.
    pub fn new(input: NewReviewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let next_review_date = curve::next_review_date(
            input.last_review_date,
            input.acceptance_rate,
            timestamp.date_naive(),
        )?;

        Ok(Self {
            id: TaskId::new(),
            chat_id: input.chat_id,
            name: input.name,
            last_review_date: input.last_review_date,
            acceptance_rate: input.acceptance_rate,
            next_review_date,
            state: TaskState::Active,
            message_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CorruptRecord`] when the record violates a
    /// task invariant.
    pub fn from_persisted(data: PersistedReviewTaskData) -> Result<Self, TaskDomainError> {
        let corrupt = |reason: &'static str| TaskDomainError::CorruptRecord {
            task_id: data.id,
            reason,
        };
        if data.next_review_date < data.last_review_date {
            return Err(corrupt("next review date precedes last review date"));
        }
        match (data.state, data.message_id) {
            (TaskState::Active, Some(_)) => {
                return Err(corrupt("active task carries a message id"));
            }
            (TaskState::Reminded, None) => {
                return Err(corrupt("reminded task has no message id"));
            }
            (TaskState::Done, _) => return Err(corrupt("done tasks live in the archive")),
            _ => {}
        }

        Ok(Self {
            id: data.id,
            chat_id: data.chat_id,
            name: data.name,
            last_review_date: data.last_review_date,
            acceptance_rate: data.acceptance_rate,
            next_review_date: data.next_review_date,
            state: data.state,
            message_id: data.message_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
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

    /// Returns the last review date.
    #[must_use]
    pub const fn last_review_date(&self) -> NaiveDate {
        self.last_review_date
    }

    /// Returns the acceptance rate.
    #[must_use]
    pub const fn acceptance_rate(&self) -> AcceptanceRate {
        self.acceptance_rate
    }

    /// Returns the next review date.
    #[must_use]
    pub const fn next_review_date(&self) -> NaiveDate {
        self.next_review_date
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the reminder message identifier while reminded.
    #[must_use]
    pub const fn message_id(&self) -> Option<MessageId> {
        self.message_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Instant the reminder becomes due: midnight UTC of the review date.
    #[must_use]
    pub fn due_at(&self) -> DateTime<Utc> {
        self.next_review_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Returns `true` if the task is active and due on or before `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.state == TaskState::Active && self.next_review_date <= now.date_naive()
    }

    /// Records a delivered reminder.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// active.
    pub fn mark_reminded(
        &mut self,
        message_id: MessageId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Reminded)?;
        self.state = TaskState::Reminded;
        self.message_id = Some(message_id);
        self.touch(clock);
        Ok(())
    }

    /// Applies an update: new rate, optionally a new last review date.
    ///
    /// The review date is recomputed, any reminder correlation is dropped and
    /// the task returns to [`TaskState::Active`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for done tasks or
    /// [`TaskDomainError::ReviewDateOutOfRange`] when the computed date
    /// overflows. The task is unchanged on error.
    pub fn reschedule(
        &mut self,
        acceptance_rate: AcceptanceRate,
        last_review_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Active)?;
        let timestamp = clock.utc();
        let reviewed_on = last_review_date.unwrap_or(self.last_review_date);
        let next_review_date =
            curve::next_review_date(reviewed_on, acceptance_rate, timestamp.date_naive())?;

        self.last_review_date = reviewed_on;
        self.acceptance_rate = acceptance_rate;
        self.next_review_date = next_review_date;
        self.state = TaskState::Active;
        self.message_id = None;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Completes a reminded task and returns its archive snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// reminded.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<ArchivedTask, TaskDomainError> {
        self.ensure_transition(TaskState::Done)?;
        self.state = TaskState::Done;
        self.touch(clock);
        Ok(ArchivedTask::snapshot(self, self.updated_at))
    }

    fn ensure_transition(&self, target: TaskState) -> Result<(), TaskDomainError> {
        if self.state.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.state,
            to: target,
        })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
