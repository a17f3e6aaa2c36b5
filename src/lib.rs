//! Revisit: spaced-repetition review reminders.
//!
//! This crate schedules review reminders for named learning tasks. Each task's
//! next review date comes from an exponential forgetting curve weighted by the
//! task's acceptance rate. A reminder is delivered when the date arrives, and
//! acknowledging that reminder archives the task.
//!
//! # Architecture
//!
//! Revisit follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and delivery
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`,
//!   Telegram)
//!
//! # Modules
//!
//! - [`review`]: Review tasks, the forgetting curve and reminder scheduling
//! - [`config`]: Environment configuration for the `revisitd` daemon

pub mod config;
pub mod review;
