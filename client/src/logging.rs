//! Log output for the `realm` binary.
//!
//! Discovery rounds, selections and realm changes are emitted as `tracing`
//! events; this module installs the subscriber that prints them. `RUST_LOG`
//! takes precedence over the configured level when set.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ClientError;

/// Output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Coloured lines for a terminal running `realm watch`.
    #[default]
    Human,
    /// Newline-delimited JSON for log collectors.
    Json,
}

impl FromStr for LogFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(ClientError::Config(format!("unknown log format: {other}"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Human => "human",
            Self::Json => "json",
        })
    }
}

fn env_filter(level: &str) -> Result<EnvFilter, ClientError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| ClientError::Config(format!("invalid log level {level:?}: {e}"))),
    }
}

/// Install the global tracing subscriber.
///
/// Fails on an unparseable level or when a subscriber is already installed.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), ClientError> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Human => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
    };
    installed.map_err(|e| ClientError::Config(format!("logging already initialized: {e}")))
}
