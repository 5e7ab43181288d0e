//! Configuration management.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. TOML config file (`--config`, or `<config dir>/rowexport/config.toml`)
//! 3. `ROWEXPORT_*` environment variables (a `.env` file is loaded first)
//! 4. CLI flags, applied by the caller

use crate::io::formats::{CommaPolicy, Format, RenderOptions};
use crate::io::services::ExportOptions;
use crate::models::CellFormatter;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration for rowexport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowExportConfig {
    /// Default document title (file base name).
    pub title: Option<String>,
    /// Output format.
    pub format: Format,
    /// Comma handling for CSV output.
    pub comma_policy: CommaPolicy,
    /// Text for missing cells.
    pub missing_text: String,
    /// Text for null cells.
    pub null_text: String,
    /// Directory that saved files are written to.
    pub output_dir: PathBuf,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `rowexport=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Default title.
    pub title: Option<String>,
    /// Output format name.
    pub format: Option<String>,
    /// Comma policy name.
    pub comma_policy: Option<String>,
    /// Missing cell placeholder.
    pub missing_text: Option<String>,
    /// Null cell placeholder.
    pub null_text: Option<String>,
    /// Output directory.
    pub output_dir: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for RowExportConfig {
    fn default() -> Self {
        Self {
            title: None,
            format: Format::Csv,
            comma_policy: CommaPolicy::Strip,
            missing_text: String::new(),
            null_text: String::new(),
            output_dir: PathBuf::from("."),
            logging: LoggingSettings::default(),
        }
    }
}

impl RowExportConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or names an unknown format
    /// or comma policy.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Returns the defaults if no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Converts a `ConfigFile` to `RowExportConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        config.title = file.title;
        if let Some(format) = file.format {
            config.format = parse_export_format(&format)?;
        }
        if let Some(policy) = file.comma_policy {
            config.comma_policy = CommaPolicy::from_str(&policy)?;
        }
        if let Some(text) = file.missing_text {
            config.missing_text = text;
        }
        if let Some(text) = file.null_text {
            config.null_text = text;
        }
        if let Some(dir) = file.output_dir {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Applies `ROWEXPORT_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unknown format or policy.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unknown format or policy.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(title) = lookup("ROWEXPORT_TITLE") {
            self.title = Some(title);
        }
        if let Some(format) = lookup("ROWEXPORT_FORMAT") {
            self.format = parse_export_format(&format)?;
        }
        if let Some(policy) = lookup("ROWEXPORT_COMMA_POLICY") {
            self.comma_policy = CommaPolicy::from_str(&policy)?;
        }
        if let Some(dir) = lookup("ROWEXPORT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup("ROWEXPORT_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(level) = lookup("ROWEXPORT_LOG") {
            self.logging.level = Some(level);
        }
        Ok(())
    }

    /// Export options derived from this configuration.
    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        let formatter = CellFormatter::new()
            .with_missing(self.missing_text.clone())
            .with_null(self.null_text.clone());
        ExportOptions::default()
            .with_format(self.format)
            .with_render(
                RenderOptions::default()
                    .with_comma_policy(self.comma_policy)
                    .with_formatter(formatter),
            )
    }
}

/// Parses a format name, accepting only renderable formats.
///
/// # Errors
///
/// Returns an error for unknown names or input-only formats.
pub fn parse_export_format(name: &str) -> Result<Format> {
    let format = Format::from_str(name)?;
    if format.supports_export() {
        Ok(format)
    } else {
        Err(Error::InvalidInput(format!(
            "Format {format} does not support export"
        )))
    }
}

/// Platform config file location (`<config dir>/rowexport/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("rowexport").join("config.toml"))
}
