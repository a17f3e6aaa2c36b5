//! Delivery port for reminder messages.

use crate::review::domain::{ChatId, MessageId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for gateway operations.
pub type ReminderGatewayResult<T> = Result<T, ReminderGatewayError>;

/// Message transport contract.
#[async_trait]
pub trait ReminderGateway: Send + Sync {
    /// Sends `text` to a chat and returns the transport's message identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderGatewayError`] when the transport rejects or fails
    /// the delivery.
    async fn send(&self, chat_id: ChatId, text: &str) -> ReminderGatewayResult<MessageId>;
}

/// Delivery failures reported by gateway adapters.
#[derive(Debug, Clone, Error)]
pub enum ReminderGatewayError {
    /// The transport refused the message.
    #[error("delivery to chat {chat_id} rejected: {reason}")]
    Rejected {
        /// Destination chat.
        chat_id: ChatId,
        /// Transport-provided reason.
        reason: String,
    },

    /// The transport could not be reached or answered unexpectedly.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReminderGatewayError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
