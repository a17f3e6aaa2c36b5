//! Spaced-repetition review scheduling.
//!
//! Tasks carry a last review date and an acceptance rate. A forgetting-curve
//! model turns those into a next review date, a one-shot timer delivers the
//! reminder when that date arrives, and a daily sweep catches reminders whose
//! timers were lost. Acknowledging a reminder archives the task. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
