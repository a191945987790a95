//! Tracing setup for the CLI.
//!
//! Stdout carries prompts and formatted results, so diagnostics go to a log
//! file instead. The filter comes from the config and can be overridden with
//! the `CHATVEC_LOG` environment variable.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::error::ConfigError;
use crate::models::LoggingConfig;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV_VAR: &str = "CHATVEC_LOG";

/// Install the global tracing subscriber writing to the configured log file.
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true);

    Registry::default().with(env_filter).with(file_layer).init();
    Ok(())
}
