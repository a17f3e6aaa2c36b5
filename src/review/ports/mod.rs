//! Port contracts for review scheduling.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.

pub mod archive;
pub mod gateway;
pub mod repository;

pub use archive::ArchiveRepository;
pub use gateway::{ReminderGateway, ReminderGatewayError, ReminderGatewayResult};
pub use repository::{ReviewTaskRepository, TaskRepositoryError, TaskRepositoryResult};
