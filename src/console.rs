//! Terminal transport: one stdin line is one message from a fixed identity.
//!
//! Replies are printed with `console` styling. Keyboards are shown as a row
//! of bracketed captions; type a caption verbatim to "press" it.

use console::Style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::gateway::{ChatGateway, ChatId, InboundMessage, Keyboard, Reply, UserId};

pub struct ConsoleGateway<R> {
    lines: Lines<R>,
    user: UserId,
    name: Option<String>,
    bot: Style,
    button: Style,
    link: Style,
}

impl ConsoleGateway<BufReader<Stdin>> {
    pub fn stdin(user: UserId, name: Option<String>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), user, name)
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleGateway<R> {
    pub fn new(reader: R, user: UserId, name: Option<String>) -> Self {
        Self {
            lines: reader.lines(),
            user,
            name,
            bot: Style::new().green(),
            button: Style::new().cyan().bold(),
            link: Style::new().blue().underlined(),
        }
    }

    // The console has a single conversation, keyed by the user id.
    fn chat(&self) -> ChatId {
        ChatId(self.user.0)
    }

    /// Formats a reply for the terminal.
    pub fn render(&self, reply: &Reply) -> String {
        let mut out = format!("{} {}", self.bot.apply_to("bot>"), reply.text);
        if let Some(link) = &reply.link {
            out.push_str(&format!("\n  {} {}", link.caption, self.link.apply_to(&link.url)));
        }
        if let Some(Keyboard::Rows(rows)) = &reply.keyboard {
            for row in rows {
                let buttons: Vec<String> = row
                    .iter()
                    .map(|caption| format!("{}", self.button.apply_to(format!("[{caption}]"))))
                    .collect();
                out.push_str(&format!("\n  {}", buttons.join(" ")));
            }
        }
        out
    }
}

impl<R: AsyncBufRead + Unpin> ChatGateway for ConsoleGateway<R> {
    type Error = std::io::Error;

    async fn receive(&mut self) -> Result<Option<Vec<InboundMessage>>, std::io::Error> {
        let Some(line) = self.lines.next_line().await? else {
            return Ok(None);
        };
        let mut message = InboundMessage::new(self.chat(), self.user, line);
        message.sender_name = self.name.clone();
        Ok(Some(vec![message]))
    }

    async fn send(&self, _chat: ChatId, reply: &Reply) -> Result<(), std::io::Error> {
        println!("{}", self.render(reply));
        Ok(())
    }
}
