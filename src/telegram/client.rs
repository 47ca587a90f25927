use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::TelegramError;
use super::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};
use crate::gateway::{ChatGateway, ChatId, InboundMessage, Reply, UserId};

/// Long-polling Telegram Bot API client.
pub struct TelegramClient {
    token: String,
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
    // Next update id to ask for.
    offset: i64,
}

impl TelegramClient {
    /// `base_url` is normally `https://api.telegram.org`; tests point it at
    /// a local mock.
    pub fn with_base_url(
        token: String,
        base_url: String,
        poll_timeout_secs: u64,
    ) -> Result<Self, TelegramError> {
        // The HTTP timeout has to outlive the server-side long poll.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()?;
        Ok(Self {
            token,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_timeout_secs,
            offset: 0,
        })
    }

    pub async fn get_updates(&self) -> Result<Vec<Update>, TelegramError> {
        let req = GetUpdatesRequest {
            offset: self.offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: vec!["message".to_string()],
        };
        self.call("getUpdates", &req).await
    }

    pub async fn send_message(&self, req: &SendMessageRequest) -> Result<(), TelegramError> {
        let _: serde_json::Value = self.call("sendMessage", req).await?;
        Ok(())
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, TelegramError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{method}", self.base_url, self.token);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let envelope = match serde_json::from_str::<ApiResponse<R>>(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::ApiError {
                    status: status.as_u16(),
                    message: text,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let code = envelope.error_code.unwrap_or(status.as_u16());
        if code == 429 {
            let retry_after = envelope
                .parameters
                .and_then(|p| p.retry_after)
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(TelegramError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        match envelope.result {
            Some(result) if envelope.ok => Ok(result),
            _ => Err(TelegramError::ApiError {
                status: code,
                message: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }

    /// Advances the offset past `updates` and keeps the human text messages.
    fn accept(&mut self, updates: Vec<Update>) -> Vec<InboundMessage> {
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = self.offset.max(last + 1);
        }

        updates
            .into_iter()
            .filter_map(|update| {
                let message = update.message?;
                let from = message.from.filter(|user| !user.is_bot)?;
                let text = message.text?;
                debug!(
                    update = update.update_id,
                    message = message.message_id,
                    user = from.id,
                    "inbound message"
                );
                Some(
                    InboundMessage::new(ChatId(message.chat.id), UserId(from.id), text)
                        .with_sender_name(from.first_name),
                )
            })
            .collect()
    }
}

impl ChatGateway for TelegramClient {
    type Error = TelegramError;

    async fn receive(&mut self) -> Result<Option<Vec<InboundMessage>>, TelegramError> {
        let updates = self.get_updates().await?;
        Ok(Some(self.accept(updates)))
    }

    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), TelegramError> {
        self.send_message(&SendMessageRequest::from_reply(chat, reply)).await
    }
}
