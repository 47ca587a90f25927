mod bot;
mod cli;
mod config;
mod console;
mod engine;
mod error;
mod gateway;
mod router;
mod state_machine;
mod store;
mod telegram;
mod telemetry;
mod texts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bot::Bot;
use cli::{Cli, Command};
use config::{BotConfig, DEFAULT_CONFIG_PATH};
use console::ConsoleGateway;
use error::BotError;
use gateway::UserId;
use router::DialogRouter;
use telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = BotConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    telemetry::init(&config.log_level, cli.verbose)?;

    let admins = config.admin_list();
    info!(admins = admins.len(), config = %path.display(), "vacancy bot starting");
    let router = DialogRouter::in_memory(admins, &config.affirmative);

    match cli.command {
        Command::Serve => {
            if config.telegram_token.is_empty() {
                return Err(BotError::Config(
                    "telegram_token is empty; set it in the config file or TELEGRAM_BOT_TOKEN".into(),
                )
                .into());
            }
            let client = TelegramClient::with_base_url(
                config.telegram_token.clone(),
                config.api_base_url.clone(),
                config.poll_timeout_secs,
            )
            .map_err(BotError::from)?;
            Bot::new(client, router).run().await
        }
        Command::Console { user, name } => {
            let gateway = ConsoleGateway::stdin(UserId(user), name);
            Bot::new(gateway, router).run().await
        }
    }
}
