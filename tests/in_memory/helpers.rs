//! Shared fixtures for in-memory review integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use revisit::review::{
    adapters::memory::{
        InMemoryArchiveRepository, InMemoryReviewTaskRepository, ManualClock, RecordingGateway,
    },
    domain::{ChatId, MessageId},
    services::{CreateTaskRequest, ReviewLifecycleService},
};
use rstest::fixture;

/// Lifecycle service wired to in-memory adapters.
pub type TestService = ReviewLifecycleService<
    InMemoryReviewTaskRepository,
    InMemoryArchiveRepository,
    RecordingGateway,
    ManualClock,
>;

/// Chat used by most scenarios.
pub const CHAT: i64 = 555;

/// Service plus handles on the adapters it was built from.
pub struct ReviewHarness {
    pub service: TestService,
    pub repository: Arc<InMemoryReviewTaskRepository>,
    pub archive: Arc<InMemoryArchiveRepository>,
    pub gateway: RecordingGateway,
    pub clock: ManualClock,
}

impl ReviewHarness {
    /// Builds a harness whose clock reads `now`.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let repository = Arc::new(InMemoryReviewTaskRepository::new());
        let archive = Arc::new(InMemoryArchiveRepository::new());
        let gateway = RecordingGateway::new();
        let clock = ManualClock::new(now);
        let service = ReviewLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&archive),
            Arc::new(gateway.clone()),
            Arc::new(clock.clone()),
        );
        Self {
            service,
            repository,
            archive,
            gateway,
            clock,
        }
    }

    /// Returns the message identifier of the most recent reminder for `chat`.
    #[must_use]
    pub fn last_reminder_for(&self, chat: i64) -> Option<MessageId> {
        self.gateway
            .sent()
            .iter()
            .rev()
            .find(|reminder| reminder.chat_id == ChatId::new(chat))
            .map(|reminder| reminder.message_id)
    }
}

/// Harness starting on the morning of 2024-01-01.
#[fixture]
pub fn harness() -> ReviewHarness {
    ReviewHarness::starting_at(utc(2024, 1, 1, 8))
}

/// Returns a UTC instant on the hour.
///
/// # Panics
///
/// Panics if the arguments do not form a valid timestamp.
#[must_use]
pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Request creating a task in [`CHAT`] last reviewed on 2024-01-01.
#[must_use]
pub fn create_request(name: &str, rate: f64) -> CreateTaskRequest {
    CreateTaskRequest::new(CHAT, name, "2024-01-01", rate)
}
