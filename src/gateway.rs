//! Transport boundary between the dialogue core and a chat platform.
//!
//! The core only sees [`InboundMessage`] values and produces [`Reply`]
//! values. Any transport that can deliver the former and render the latter
//! implements [`ChatGateway`]; see [`crate::telegram`] and [`crate::console`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque identity of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversation a reply should be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A text message received from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub sender: UserId,
    /// First name of the sender, when the transport knows it.
    pub sender_name: Option<String>,
    pub text: String,
}

impl InboundMessage {
    pub fn new(chat: ChatId, sender: UserId, text: impl Into<String>) -> Self {
        Self {
            chat,
            sender,
            sender_name: None,
            text: text.into(),
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }
}

/// Reply keyboard attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Show these rows of caption buttons.
    Rows(Vec<Vec<String>>),
    /// Hide whatever keyboard is currently shown.
    Remove,
}

/// A single button that opens an external URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub caption: String,
    pub url: String,
}

/// A message the bot sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub link: Option<LinkButton>,
    /// `text` is MarkdownV2 source; interpolated user text must already be
    /// escaped with [`crate::texts::escape_markdown`].
    pub markdown: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            link: None,
            markdown: false,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_link(mut self, caption: impl Into<String>, url: impl Into<String>) -> Self {
        self.link = Some(LinkButton {
            caption: caption.into(),
            url: url.into(),
        });
        self
    }

    pub fn markdown(mut self) -> Self {
        self.markdown = true;
        self
    }
}

/// Transport failure as seen by the dispatch loop.
pub trait GatewayError: std::error::Error + Send + Sync + 'static {
    /// Pause the platform asked for before the next request, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl GatewayError for std::io::Error {}

/// A chat platform the bot can talk through.
///
/// `receive` waits for the next batch of inbound messages; an empty batch
/// means nothing arrived before the transport's own timeout. `None` means
/// the transport is exhausted and the dispatch loop should stop.
pub trait ChatGateway {
    type Error: GatewayError;

    async fn receive(&mut self) -> Result<Option<Vec<InboundMessage>>, Self::Error>;

    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), Self::Error>;
}
