//! Adapter implementations for review repository and gateway ports.

pub mod memory;
pub mod postgres;

mod telegram;

pub use telegram::{DEFAULT_TELEGRAM_API, TelegramGateway};
