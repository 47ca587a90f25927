//! Logging setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global fmt subscriber.
///
/// `verbose` forces `debug`; otherwise a non-empty `RUST_LOG` wins over
/// `level`. Whichever directive is chosen must parse.
pub fn init(level: &str, verbose: bool) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(directive(level, verbose, rust_log.as_deref()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn directive<'a>(level: &'a str, verbose: bool, rust_log: Option<&'a str>) -> &'a str {
    match rust_log {
        _ if verbose => "debug",
        Some(env) if !env.trim().is_empty() => env,
        _ => level,
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::EnvFilter {
        value: level.to_string(),
        source,
    })
}
