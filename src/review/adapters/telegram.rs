//! Telegram Bot API gateway for reminder delivery.

use crate::review::{
    domain::{ChatId, MessageId},
    ports::{ReminderGateway, ReminderGatewayError, ReminderGatewayResult},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default Bot API endpoint.
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Gateway delivering reminders through the `sendMessage` Bot API method.
#[derive(Debug, Clone)]
pub struct TelegramGateway {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramGateway {
    /// Creates a gateway for the bot identified by `token`.
    ///
    /// `api_base` is normally [`DEFAULT_TELEGRAM_API`]; tests and self-hosted
    /// Bot API servers override it.
    #[must_use]
    pub fn new(api_base: &str, token: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base, token)
    }

    /// Creates a gateway that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, api_base: &str, token: &str) -> Self {
        let endpoint = format!("{}/bot{token}/sendMessage", api_base.trim_end_matches('/'));
        Self { client, endpoint }
    }
}

#[async_trait]
impl ReminderGateway for TelegramGateway {
    async fn send(&self, chat_id: ChatId, text: &str) -> ReminderGatewayResult<MessageId> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SendMessageRequest {
                chat_id: chat_id.value(),
                text,
            })
            .send()
            .await
            .map_err(ReminderGatewayError::transport)?;

        // Bot API errors carry a JSON body with `ok: false`, so the status
        // code alone is not inspected.
        let body = response
            .text()
            .await
            .map_err(ReminderGatewayError::transport)?;
        interpret_response(chat_id, &body)
    }
}

fn interpret_response(chat_id: ChatId, body: &str) -> ReminderGatewayResult<MessageId> {
    let parsed: SendMessageResponse =
        serde_json::from_str(body).map_err(ReminderGatewayError::transport)?;
    match (parsed.ok, parsed.result) {
        (true, Some(message)) => Ok(MessageId::new(message.message_id)),
        (true, None) => Err(ReminderGatewayError::Rejected {
            chat_id,
            reason: "response carried no message".to_owned(),
        }),
        (false, _) => Err(ReminderGatewayError::Rejected {
            chat_id,
            reason: parsed
                .description
                .unwrap_or_else(|| "unspecified Bot API error".to_owned()),
        }),
    }
}
