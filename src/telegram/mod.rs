pub mod client;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
