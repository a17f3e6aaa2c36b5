//! Reminder scheduling: one-shot timers, the daily catch-up sweep, and the
//! dispatch routine both paths share.
//!
//! Timers are process-local tokio tasks, so a restart loses them. The sweep
//! re-selects every active task whose review date has passed, which is what
//! makes a lost timer recoverable. Both paths funnel into a single dispatch
//! routine that re-reads the task under the dispatch gate and only sends when
//! the task is still active, so a timer and a sweep racing for the same task
//! deliver one reminder. A fired timer claims its table entry only once it
//! holds the gate; a timer cancelled or replaced while it waited sends
//! nothing.

use super::SchedulerConfig;
use crate::review::{
    domain::{MessageId, ReviewTask, TaskDomainError, TaskId, TaskState},
    ports::{ReminderGateway, ReviewTaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Days, NaiveTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Errors surfaced by scheduler operations.
///
/// Delivery failures are not errors here; they are reported through
/// [`DispatchOutcome::DeliveryFailed`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A task refused the reminded transition.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Result of a single dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reminder was delivered and the task is now reminded.
    Dispatched(MessageId),
    /// The task was no longer active; nothing was sent.
    NotActive(TaskState),
    /// The task no longer exists.
    Missing,
    /// The gateway failed; the task stays active for the next sweep.
    DeliveryFailed,
}

/// Tally of one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Due tasks returned by the repository.
    pub examined: usize,
    /// Reminders delivered.
    pub dispatched: usize,
    /// Tasks that were no longer active or had vanished by dispatch time.
    pub skipped: usize,
    /// Deliveries the gateway rejected.
    pub failed: usize,
}

impl SweepReport {
    const fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Dispatched(_) => self.dispatched += 1,
            DispatchOutcome::NotActive(_) | DispatchOutcome::Missing => self.skipped += 1,
            DispatchOutcome::DeliveryFailed => self.failed += 1,
        }
    }
}

#[derive(Debug)]
struct ScheduledTimer {
    generation: u64,
    at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct TimerTable {
    entries: HashMap<TaskId, ScheduledTimer>,
    next_generation: u64,
}

/// Reminder scheduler owning every pending timer.
pub struct ReminderScheduler<R, G, C>
where
    R: ReviewTaskRepository,
    G: ReminderGateway,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    clock: Arc<C>,
    timers: Arc<Mutex<TimerTable>>,
    dispatch_gate: Arc<tokio::sync::Mutex<()>>,
}

impl<R, G, C> Clone for ReminderScheduler<R, G, C>
where
    R: ReviewTaskRepository,
    G: ReminderGateway,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
            timers: Arc::clone(&self.timers),
            dispatch_gate: Arc::clone(&self.dispatch_gate),
        }
    }
}

impl<R, G, C> ReminderScheduler<R, G, C>
where
    R: ReviewTaskRepository + 'static,
    G: ReminderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler with no pending timers.
    #[must_use]
    pub fn new(repository: Arc<R>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            repository,
            gateway,
            clock,
            timers: Arc::default(),
            dispatch_gate: Arc::default(),
        }
    }

    /// Registers the one-shot timer for a task, replacing any previous one.
    ///
    /// Instants in the past fire immediately. Must be called from within a
    /// Tokio runtime.
    pub fn schedule(&self, task_id: TaskId, at: DateTime<Utc>) {
        let delay = at
            .signed_duration_since(self.clock.utc())
            .to_std()
            .unwrap_or_default();

        let mut timers = self.lock_timers();
        if let Some(previous) = timers.entries.remove(&task_id) {
            previous.handle.abort();
            debug!(%task_id, previous_at = %previous.at, "replaced reminder timer");
        }
        let generation = timers.next_generation;
        timers.next_generation += 1;

        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.fire(task_id, generation).await;
        });
        timers.entries.insert(
            task_id,
            ScheduledTimer {
                generation,
                at,
                handle,
            },
        );
        debug!(%task_id, %at, "scheduled reminder timer");
    }

    /// Cancels the pending timer of a task.
    ///
    /// Returns `false` when the task had no pending timer.
    pub fn cancel(&self, task_id: TaskId) -> bool {
        let Some(timer) = self.lock_timers().entries.remove(&task_id) else {
            return false;
        };
        timer.handle.abort();
        debug!(%task_id, "cancelled reminder timer");
        true
    }

    /// Cancels every pending timer and returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<ScheduledTimer> = self
            .lock_timers()
            .entries
            .drain()
            .map(|(_, timer)| timer)
            .collect();
        for timer in &drained {
            timer.handle.abort();
        }
        drained.len()
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock_timers().entries.len()
    }

    /// Returns when the task's pending timer fires, if it has one.
    #[must_use]
    pub fn scheduled_at(&self, task_id: TaskId) -> Option<DateTime<Utc>> {
        self.lock_timers()
            .entries
            .get(&task_id)
            .map(|timer| timer.at)
    }

    /// Dispatches every active task whose review date is on or before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Repository`] when loading or updating tasks
    /// fails. Delivery failures are counted in the report instead.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SchedulerResult<SweepReport> {
        let due = self.repository.find_due(now.date_naive()).await?;
        let mut report = SweepReport {
            examined: due.len(),
            ..SweepReport::default()
        };
        for task in due {
            let outcome = self.attempt_dispatch(task.id()).await?;
            report.record(outcome);
        }
        info!(
            examined = report.examined,
            dispatched = report.dispatched,
            skipped = report.skipped,
            failed = report.failed,
            "reminder sweep finished"
        );
        Ok(report)
    }

    /// Schedules a timer for every active task in the repository.
    ///
    /// Used at startup since timers do not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Repository`] when loading tasks fails.
    pub async fn restore(&self) -> SchedulerResult<usize> {
        let active = self.repository.find_active().await?;
        for task in &active {
            self.schedule(task.id(), task.due_at());
        }
        info!(restored = active.len(), "restored reminder timers");
        Ok(active.len())
    }

    /// Runs the sweep once a day at the configured time, forever.
    pub async fn run_daily_sweep(&self, config: SchedulerConfig) {
        loop {
            let now = self.clock.utc();
            let next = next_sweep_at(now, config.sweep_time());
            debug!(%next, "waiting for next reminder sweep");
            let delay = next.signed_duration_since(now).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;

            if let Err(err) = self.sweep(self.clock.utc()).await {
                error!(error = %err, "reminder sweep failed");
            }
        }
    }

    /// Sends the reminder for a task if it is still active.
    ///
    /// The sweep goes through here; fired timers run the same body once they
    /// have claimed their entry.
    pub(crate) async fn attempt_dispatch(
        &self,
        task_id: TaskId,
    ) -> SchedulerResult<DispatchOutcome> {
        let _gate = self.exclusive().await;
        self.dispatch_locked(task_id).await
    }

    /// Acquires the gate serialising every read-check-write on tasks.
    pub(crate) async fn exclusive(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_gate.lock().await
    }

    /// Dispatch body; the caller holds the gate.
    async fn dispatch_locked(&self, task_id: TaskId) -> SchedulerResult<DispatchOutcome> {
        let Some(mut task) = self.repository.find_by_id(task_id).await? else {
            debug!(%task_id, "skipping dispatch for removed task");
            return Ok(DispatchOutcome::Missing);
        };
        if task.state() != TaskState::Active {
            debug!(%task_id, state = task.state().as_str(), "skipping dispatch");
            return Ok(DispatchOutcome::NotActive(task.state()));
        }

        let message_id = match self
            .gateway
            .send(task.chat_id(), &reminder_text(&task))
            .await
        {
            Ok(message_id) => message_id,
            Err(err) => {
                warn!(%task_id, chat_id = %task.chat_id(), error = %err, "reminder delivery failed");
                return Ok(DispatchOutcome::DeliveryFailed);
            }
        };

        task.mark_reminded(message_id, &*self.clock)?;
        self.repository.update(&task).await?;
        info!(%task_id, chat_id = %task.chat_id(), %message_id, "reminder dispatched");
        Ok(DispatchOutcome::Dispatched(message_id))
    }

    async fn fire(&self, task_id: TaskId, generation: u64) {
        let _gate = self.exclusive().await;
        if !self.claim_timer(task_id, generation) {
            debug!(%task_id, "superseded reminder timer fired, skipping");
            return;
        }
        match self.dispatch_locked(task_id).await {
            Ok(outcome) => debug!(%task_id, ?outcome, "reminder timer fired"),
            Err(err) => error!(%task_id, error = %err, "reminder timer dispatch failed"),
        }
    }

    /// Removes a fired timer's entry if it is still the task's current one.
    ///
    /// Returns `false` when the timer was cancelled or replaced meanwhile.
    fn claim_timer(&self, task_id: TaskId, generation: u64) -> bool {
        let mut timers = self.lock_timers();
        let current = timers
            .entries
            .get(&task_id)
            .is_some_and(|timer| timer.generation == generation);
        if current {
            timers.entries.remove(&task_id);
        }
        current
    }

    fn lock_timers(&self) -> MutexGuard<'_, TimerTable> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reminder body sent for a due task.
#[must_use]
pub fn reminder_text(task: &ReviewTask) -> String {
    format!("Time to review: {}", task.name())
}

/// Returns the first daily `sweep_time` (UTC) strictly after `now`.
#[must_use]
pub fn next_sweep_at(now: DateTime<Utc>, sweep_time: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(sweep_time).and_utc();
    if today > now {
        return today;
    }
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}
