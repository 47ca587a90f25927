use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::gateway::{ChatGateway, ChatId, GatewayError, InboundMessage, Reply};
use crate::router::DialogRouter;

/// Delay policy after consecutive receive failures.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Upper bound for a single delay.
    pub max_delay_ms: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
        }
    }
}

impl Backoff {
    /// delay = base_delay_ms * 2^(attempt - 1), capped at max_delay_ms.
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }

    /// Backoff for `attempt`, stretched to whatever pause `err` asks for.
    pub fn delay_after<E: GatewayError>(&self, attempt: u32, err: &E) -> u64 {
        let requested = err
            .retry_after()
            .map_or(0, |wait| u64::try_from(wait.as_millis()).unwrap_or(u64::MAX));
        self.delay_for_attempt(attempt).max(requested)
    }
}

/// Joins a transport to the router. Messages are handled strictly one at a
/// time, in arrival order.
pub struct Bot<G> {
    gateway: G,
    router: DialogRouter,
    backoff: Backoff,
}

impl<G: ChatGateway> Bot<G> {
    pub fn new(gateway: G, router: DialogRouter) -> Self {
        Self {
            gateway,
            router,
            backoff: Backoff::default(),
        }
    }

    /// Runs until the gateway is exhausted or Ctrl-C is pressed.
    pub async fn run(mut self) -> Result<()> {
        info!("dispatch loop started");
        let mut failures: u32 = 0;

        loop {
            let batch = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested");
                    break;
                }
                batch = self.gateway.receive() => batch,
            };

            match batch {
                Ok(Some(messages)) => {
                    failures = 0;
                    for message in &messages {
                        self.handle(message).await;
                    }
                }
                Ok(None) => {
                    info!("gateway closed");
                    break;
                }
                Err(err) => {
                    failures += 1;
                    let delay_ms = self.backoff.delay_after(failures, &err);
                    warn!(%err, attempt = failures, delay_ms, "receive failed");
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }

        info!("dispatch loop stopped");
        Ok(())
    }

    async fn handle(&self, message: &InboundMessage) {
        for reply in self.router.dispatch(message) {
            if let Err(err) = self.deliver(message.chat, &reply).await {
                warn!(%err, chat = %message.chat, "failed to deliver reply");
            }
        }
    }

    /// Sends `reply`, retrying once if the platform asked to slow down.
    async fn deliver(&self, chat: ChatId, reply: &Reply) -> Result<(), G::Error> {
        let Err(err) = self.gateway.send(chat, reply).await else {
            return Ok(());
        };
        let Some(wait) = err.retry_after() else {
            return Err(err);
        };
        debug!(%chat, ?wait, "send rate limited, retrying");
        sleep(wait).await;
        self.gateway.send(chat, reply).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::AdminList;
    use crate::gateway::UserId;
    use crate::telegram::{TelegramClient, TelegramError};
    use crate::texts;

    /// Replays scripted batches and records every reply.
    struct ScriptedGateway {
        batches: VecDeque<Result<Vec<InboundMessage>, std::io::Error>>,
        sent: Mutex<Vec<(ChatId, Reply)>>,
    }

    impl ChatGateway for ScriptedGateway {
        type Error = std::io::Error;

        async fn receive(&mut self) -> Result<Option<Vec<InboundMessage>>, std::io::Error> {
            self.batches.pop_front().transpose()
        }

        async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), std::io::Error> {
            self.sent.lock().unwrap().push((chat, reply.clone()));
            Ok(())
        }
    }

    const ADMIN: UserId = UserId(1);

    fn msg(text: &str) -> InboundMessage {
        InboundMessage::new(ChatId(10), ADMIN, text)
    }

    #[test]
    fn backoff_is_exponential_and_capped() {
        let backoff = Backoff {
            base_delay_ms: 1000,
            max_delay_ms: 5000,
        };
        assert_eq!(backoff.delay_for_attempt(1), 1000);
        assert_eq!(backoff.delay_for_attempt(2), 2000);
        assert_eq!(backoff.delay_for_attempt(3), 4000);
        assert_eq!(backoff.delay_for_attempt(4), 5000);
        assert_eq!(backoff.delay_for_attempt(80), 5000);
    }

    #[test]
    fn delay_honours_requested_pause() {
        let backoff = Backoff::default();
        let limited = TelegramError::RateLimited {
            retry_after_ms: 3000,
        };
        assert_eq!(backoff.delay_after(1, &limited), 3000);
        assert_eq!(backoff.delay_after(3, &limited), 4000);
        assert_eq!(backoff.delay_after(1, &std::io::Error::other("eof")), 1000);
    }

    #[tokio::test]
    async fn rate_limited_send_is_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 0",
                "parameters": {"retry_after": 0}
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 1, "chat": {"id": 10}, "date": 0}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url("TOKEN".into(), server.uri(), 0).unwrap();
        let router = DialogRouter::in_memory(AdminList::default(), "да");
        let bot = Bot::new(client, router);

        // Greeting hits the 429 and is resent; the menu goes through directly.
        bot.handle(&msg("/start")).await;
    }

    #[tokio::test]
    async fn replies_go_to_the_originating_chat_in_order() {
        let gateway = ScriptedGateway {
            batches: VecDeque::from([Ok(vec![msg("/start"), msg(texts::SEARCH_VACANCIES)])]),
            sent: Mutex::new(Vec::new()),
        };
        let router = DialogRouter::in_memory(AdminList::new([ADMIN]), "да");
        let mut bot = Bot::new(gateway, router);

        let batch = bot.gateway.receive().await.unwrap().unwrap();
        for message in &batch {
            bot.handle(message).await;
        }

        let sent = bot.gateway.sent.lock().unwrap();
        let bodies: Vec<&str> = sent.iter().map(|(_, r)| r.text.as_str()).collect();
        assert_eq!(
            bodies,
            vec![
                "Привет! Я бот для поиска работы.",
                texts::CHOOSE_OPTION,
                texts::NO_VACANCIES,
                texts::CHOOSE_OPTION,
            ]
        );
        assert!(sent.iter().all(|(chat, _)| *chat == ChatId(10)));
    }

    #[tokio::test]
    async fn run_survives_receive_errors_and_stops_when_exhausted() {
        let gateway = ScriptedGateway {
            batches: VecDeque::from([
                Err(std::io::Error::other("boom")),
                Ok(vec![msg("hello")]),
            ]),
            sent: Mutex::new(Vec::new()),
        };
        let router = DialogRouter::in_memory(AdminList::default(), "да");
        let mut bot = Bot::new(gateway, router);
        bot.backoff = Backoff {
            base_delay_ms: 1,
            max_delay_ms: 1,
        };

        bot.run().await.unwrap();
    }
}
