//! In-memory adapters for review scheduling tests.

mod archive;
mod clock;
mod gateway;
mod task;

pub use archive::InMemoryArchiveRepository;
pub use clock::ManualClock;
pub use gateway::{RecordingGateway, SentReminder};
pub use task::InMemoryReviewTaskRepository;
