//! Command line interface built on clap.
//!
//! [`Cli`] carries the global flags (--config, --verbose) and one
//! [`Command`] choosing the transport.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Job-board chat bot.
#[derive(Debug, Parser)]
#[command(name = "vacancy-bot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Long-poll the Telegram Bot API and answer messages.
    Serve,

    /// Talk to the bot from the terminal as the given user.
    Console {
        /// Numeric identity to send messages as.
        #[arg(long)]
        user: i64,

        /// First name used in the greeting.
        #[arg(long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_serve_subcommand() {
        let cli = Cli::parse_from(["vacancy-bot", "serve"]);
        assert!(matches!(cli.command, Command::Serve));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_console_subcommand() {
        let cli = Cli::parse_from(["vacancy-bot", "console", "--user", "5665104217", "--name", "Ира"]);
        match cli.command {
            Command::Console { user, name } => {
                assert_eq!(user, 5665104217);
                assert_eq!(name.as_deref(), Some("Ира"));
            }
            _ => panic!("expected Console command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["vacancy-bot", "--config", "bot.toml", "-v", "serve"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("bot.toml")));
    }

    #[test]
    fn console_requires_user() {
        assert!(Cli::try_parse_from(["vacancy-bot", "console"]).is_err());
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
