//! Wire types for the subset of the Telegram Bot API the bot uses.
//!
//! Only `getUpdates` and `sendMessage` are needed. Unknown fields in API
//! responses are ignored by serde.

use serde::{Deserialize, Serialize};

use crate::gateway::{ChatId, Keyboard, Reply};

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<u16>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before retrying after a 429.
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    /// Absent for stickers, photos and other non-text messages.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Body of `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageRequest {
    /// Translates a core [`Reply`].
    ///
    /// The API takes a single markup per message, so a link button wins
    /// over a reply keyboard.
    pub fn from_reply(chat: ChatId, reply: &Reply) -> Self {
        let reply_markup = match (&reply.link, &reply.keyboard) {
            (Some(link), _) => Some(ReplyMarkup::Inline {
                inline_keyboard: vec![vec![InlineKeyboardButton {
                    text: link.caption.clone(),
                    url: link.url.clone(),
                }]],
            }),
            (None, Some(Keyboard::Rows(rows))) => Some(ReplyMarkup::Keyboard {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|caption| KeyboardButton {
                                text: caption.clone(),
                            })
                            .collect()
                    })
                    .collect(),
                resize_keyboard: true,
            }),
            (None, Some(Keyboard::Remove)) => Some(ReplyMarkup::Remove {
                remove_keyboard: true,
            }),
            (None, None) => None,
        };

        Self {
            chat_id: chat.0,
            text: reply.text.clone(),
            parse_mode: reply.markdown.then(|| "MarkdownV2".to_string()),
            reply_markup,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
    Inline {
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}
