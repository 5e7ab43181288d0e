//! Logging and metrics setup.
//!
//! Logs go to stderr so stdout stays free for command output such as data
//! URIs. Counters are recorded through the `metrics` facade and are no-ops
//! unless the embedding application installs a recorder.

mod logging;

pub use logging::{LogFormat, LoggingConfig};

use crate::config::LoggingSettings;
use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Options for initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Whether verbose output was requested via CLI.
    pub verbose: bool,
}

/// Format of the installed subscriber, set once.
static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Initializes logging from config settings.
///
/// # Errors
///
/// Returns an error if logging has already been initialized.
pub fn init_from_config(settings: &LoggingSettings, options: InitOptions) -> Result<()> {
    init(LoggingConfig::from_settings(Some(settings), options.verbose))
}

/// Installs the global tracing subscriber.
///
/// Exactly one of the JSON and human-readable layers is active.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init(config: LoggingConfig) -> Result<()> {
    if let Some(format) = INSTALLED.get() {
        return Err(init_error(format!("{format:?} logging already installed")));
    }

    let json = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
    });
    let pretty = (config.format == LogFormat::Pretty)
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(true));

    tracing_subscriber::registry()
        .with(config.filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| init_error(e.to_string()))?;

    INSTALLED
        .set(config.format)
        .map_err(|_| init_error("logging installed concurrently".to_string()))
}

/// Returns the installed log format, if logging has been initialized.
#[must_use]
pub fn installed_format() -> Option<LogFormat> {
    INSTALLED.get().copied()
}

fn init_error(cause: String) -> Error {
    Error::OperationFailed {
        operation: "init_logging".to_string(),
        cause,
    }
}
