//! Utilities for logging.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding filter directives, e.g. `opgraph::graph=trace`.
pub const LOG_ENV_VAR: &str = "OPGRAPH_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

/// Install a global subscriber writing to stderr.
///
/// `default_level` applies unless [`LOG_ENV_VAR`] holds directives. Calling this
/// again after a subscriber was installed has no effect.
pub fn configure_global_logger(default_level: Level, format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let result = match format {
        LogFormat::HumanReadable => {
            let subscriber = FmtSubscriber::builder()
                .with_writer(io::stderr)
                .with_env_filter(env_filter)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_writer(io::stderr)
                .with_env_filter(env_filter)
                .with_current_span(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if result.is_err() {
        tracing::debug!("global logger already configured");
    }
}
