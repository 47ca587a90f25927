//! Error types for the Telegram Bot API client.
//!
//! [`TelegramError`] covers rate limiting, API-level refusals, transport
//! failures and undecodable bodies.

use std::time::Duration;

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that can occur while talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The API answered 429. `retry_after_ms` is how long to wait.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The API answered `"ok": false` or a non-success status.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, timeout).
    /// The request URL is stripped since it embeds the bot token.
    #[error("network error: {0}")]
    NetworkError(reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::NetworkError(err.without_url())
    }
}

impl GatewayError for TelegramError {
    fn retry_after(&self) -> Option<Duration> {
        match self {
            TelegramError::RateLimited { retry_after_ms } => {
                Some(Duration::from_millis(*retry_after_ms))
            }
            _ => None,
        }
    }
}
