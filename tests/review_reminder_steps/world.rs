//! Shared world state for review reminder BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use revisit::review::{
    adapters::memory::{
        InMemoryArchiveRepository, InMemoryReviewTaskRepository, ManualClock, RecordingGateway,
    },
    domain::{ArchivedTask, MessageId, ReviewTask, parse_review_date},
    services::{ReviewLifecycleError, ReviewLifecycleService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestReviewService = ReviewLifecycleService<
    InMemoryReviewTaskRepository,
    InMemoryArchiveRepository,
    RecordingGateway,
    ManualClock,
>;

/// Chat every scenario runs in.
pub const SCENARIO_CHAT: i64 = 9001;

/// Scenario world for review reminder behaviour tests.
pub struct ReviewWorld {
    pub service: TestReviewService,
    pub gateway: RecordingGateway,
    pub clock: ManualClock,
    pub last_archived: Option<ArchivedTask>,
    pub last_create_result: Option<Result<ReviewTask, ReviewLifecycleError>>,
    pub last_ack_result: Option<Result<ArchivedTask, ReviewLifecycleError>>,
}

impl ReviewWorld {
    /// Creates a world with no tasks and no reminders sent.
    #[must_use]
    pub fn new() -> Self {
        let gateway = RecordingGateway::new();
        let clock = ManualClock::new(DateTime::<Utc>::UNIX_EPOCH);
        let service = ReviewLifecycleService::new(
            Arc::new(InMemoryReviewTaskRepository::new()),
            Arc::new(InMemoryArchiveRepository::new()),
            Arc::new(gateway.clone()),
            Arc::new(clock.clone()),
        );

        Self {
            service,
            gateway,
            clock,
            last_archived: None,
            last_create_result: None,
            last_ack_result: None,
        }
    }

    /// Returns the most recently delivered reminder, if any.
    #[must_use]
    pub fn latest_message(&self) -> Option<MessageId> {
        self.gateway
            .sent()
            .last()
            .map(|reminder| reminder.message_id)
    }
}

impl Default for ReviewWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewWorld {
    ReviewWorld::default()
}

/// Parses a scenario date as the morning of that day (UTC).
///
/// # Errors
///
/// Returns an error if `date` is not `YYYY-MM-DD`.
pub fn morning_of(date: &str) -> Result<DateTime<Utc>, eyre::Report> {
    let day: NaiveDate = parse_review_date(date)?;
    let nine = NaiveTime::from_hms_opt(9, 0, 0).ok_or_else(|| eyre::eyre!("invalid time"))?;
    Ok(day.and_time(nine).and_utc())
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
