//! Recording gateway that captures reminders instead of delivering them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::review::{
    domain::{ChatId, MessageId},
    ports::{ReminderGateway, ReminderGatewayError, ReminderGatewayResult},
};

/// A reminder accepted by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReminder {
    /// Destination chat.
    pub chat_id: ChatId,
    /// Message body.
    pub text: String,
    /// Identifier handed back to the caller.
    pub message_id: MessageId,
}

/// Gateway that records every send and hands out message IDs.
///
/// IDs are sequential per chat, starting at 1, so different chats see the
/// same IDs the way Telegram numbers them.
#[derive(Debug, Clone, Default)]
pub struct RecordingGateway {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<SentReminder>,
    attempts: usize,
    last_message_ids: HashMap<ChatId, i64>,
    rejecting: bool,
}

impl RecordingGateway {
    /// Creates a gateway that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail with [`ReminderGatewayError::Rejected`]
    /// while `rejecting` is `true`.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.lock().rejecting = rejecting;
    }

    /// Returns every accepted reminder in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentReminder> {
        self.lock().sent.clone()
    }

    /// Returns the number of send attempts, rejected ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReminderGateway for RecordingGateway {
    async fn send(&self, chat_id: ChatId, text: &str) -> ReminderGatewayResult<MessageId> {
        let mut state = self.lock();
        state.attempts += 1;
        if state.rejecting {
            return Err(ReminderGatewayError::Rejected {
                chat_id,
                reason: "recording gateway is rejecting".to_owned(),
            });
        }

        let last = state.last_message_ids.entry(chat_id).or_default();
        *last += 1;
        let message_id = MessageId::new(*last);
        state.sent.push(SentReminder {
            chat_id,
            text: text.to_owned(),
            message_id,
        });
        Ok(message_id)
    }
}
