//! Bot configuration loaded from `vacancy-bot.toml`.
//!
//! [`BotConfig`] holds every tunable. Values missing from the file use
//! sensible defaults. `TELEGRAM_BOT_TOKEN` and `VACANCY_BOT_ADMINS` take
//! precedence over the file.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::BotError;
use crate::gateway::UserId;

pub const DEFAULT_CONFIG_PATH: &str = "vacancy-bot.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Telegram Bot API token.
    #[serde(default)]
    pub telegram_token: String,

    /// Users allowed to submit vacancies.
    #[serde(default)]
    pub admin_ids: Vec<i64>,

    /// Word that confirms a submission. Compared case-insensitively.
    #[serde(default = "default_affirmative")]
    pub affirmative: String,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Long-polling timeout for `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Base URL of the Bot API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_affirmative() -> String {
    "да".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            admin_ids: Vec::new(),
            affirmative: default_affirmative(),
            log_level: default_log_level(),
            poll_timeout_secs: default_poll_timeout_secs(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl BotConfig {
    /// Loads `path`, falling back to defaults when the file does not exist,
    /// then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, BotError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<BotConfig>(&contents)?
        } else {
            Self::default()
        };

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN")
            && !token.is_empty()
        {
            config.telegram_token = token;
        }

        if let Ok(admins) = std::env::var("VACANCY_BOT_ADMINS")
            && !admins.trim().is_empty()
        {
            config.admin_ids = parse_admin_ids(&admins)?;
        }

        Ok(config)
    }

    pub fn admin_list(&self) -> AdminList {
        AdminList::new(self.admin_ids.iter().copied().map(UserId))
    }
}

/// Parses a comma-separated list of numeric user ids.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, BotError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| BotError::Config(format!("invalid admin id: {part:?}")))
        })
        .collect()
}

/// Fixed set of users allowed to submit vacancies.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    ids: HashSet<UserId>,
}

impl AdminList {
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.ids.contains(&user)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
