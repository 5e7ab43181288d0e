//! Structured logging configuration.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Default filter when nothing else is configured.
const DEFAULT_LEVEL: &str = "warn";

/// Filter used with `--verbose`.
const VERBOSE_LEVEL: &str = "rowexport=debug,info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Builds logging configuration.
    ///
    /// Filter precedence: `--verbose`, then `ROWEXPORT_LOG` / config level,
    /// then `RUST_LOG`, then `warn`. An unparsable directive falls back to
    /// the default.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();

        let directive = if verbose {
            Some(VERBOSE_LEVEL.to_string())
        } else {
            settings
                .and_then(|s| s.level.clone())
                .or_else(|| std::env::var("RUST_LOG").ok())
        };

        let filter = directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL));

        Self { filter, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("other"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_settings_uses_configured_format() {
        let settings = LoggingSettings {
            level: Some("debug".to_string()),
            format: Some("json".to_string()),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter.to_string(), "debug");
    }

    #[test]
    fn test_verbose_wins() {
        let settings = LoggingSettings {
            level: Some("error".to_string()),
            format: None,
        };
        let config = LoggingConfig::from_settings(Some(&settings), true);
        assert!(config.filter.to_string().contains("rowexport=debug"));
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        let settings = LoggingSettings {
            level: Some("rowexport=loud".to_string()),
            format: None,
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.filter.to_string(), DEFAULT_LEVEL);
    }
}
