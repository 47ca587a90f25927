use thiserror::Error;

use crate::gateway::UserId;
use crate::telegram::TelegramError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Recoverable failures inside the dialogue core.
///
/// None of these reach the user as an error; the router turns each into a
/// guidance message and re-shows the menu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VacancyError {
    #[error("user {0} is not an administrator")]
    Unauthorized(UserId),

    #[error("no active draft for user {0}")]
    NoActiveDraft(UserId),

    #[error("vacancy {0} not found")]
    NotFound(usize),
}
