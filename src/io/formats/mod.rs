//! Format adapters for row input and document output.
//!
//! Output formats implement [`DocumentRenderer`]; input formats implement
//! [`RowSource`].

pub mod csv;
pub mod html;
pub mod json;
pub mod yaml;

use crate::models::{CellFormatter, HeaderMap};
use crate::{Error, Result};
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use super::traits::{DocumentRenderer, RowSource};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Comma-separated text with CRLF line endings.
    Csv,
    /// HTML table served as a legacy Excel `.xls` file.
    ExcelHtml,
    /// JSON array or newline-delimited objects (input only).
    Json,
    /// YAML sequence of mappings (input only).
    Yaml,
}

impl Format {
    /// Returns all formats that can render documents.
    #[must_use]
    pub fn export_formats() -> Vec<Self> {
        vec![Self::Csv, Self::ExcelHtml]
    }

    /// Returns all formats that rows can be read from.
    #[must_use]
    pub fn import_formats() -> Vec<Self> {
        vec![Self::Json, Self::Yaml]
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::ExcelHtml => "xls",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::ExcelHtml => "application/vnd.ms-excel",
            Self::Json => "application/json",
            Self::Yaml => "application/x-yaml",
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some(ext) => Self::from_str(ext).map_err(|_| {
                Error::InvalidInput(format!("Unsupported file extension: .{ext}"))
            }),
            None => Err(Error::InvalidInput(
                "Cannot determine format: file has no extension".to_string(),
            )),
        }
    }

    /// Returns whether rows can be read from this format.
    #[must_use]
    pub const fn supports_import(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }

    /// Returns whether documents can be rendered in this format.
    #[must_use]
    pub const fn supports_export(&self) -> bool {
        matches!(self, Self::Csv | Self::ExcelHtml)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xls" | "excel" | "html" => Ok(Self::ExcelHtml),
            "json" | "ndjson" | "jsonl" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::InvalidInput(format!("Unknown format: {s}"))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::ExcelHtml => write!(f, "xls"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// How commas inside cell values are handled in CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommaPolicy {
    /// Remove every comma from cell text. Lossy, but keeps each line a plain
    /// comma-joined list with no quoting.
    #[default]
    Strip,
    /// Quote fields that need it, per RFC 4180.
    Quote,
}

impl FromStr for CommaPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strip" => Ok(Self::Strip),
            "quote" | "rfc4180" => Ok(Self::Quote),
            _ => Err(Error::InvalidInput(format!("Unknown comma policy: {s}"))),
        }
    }
}

impl std::fmt::Display for CommaPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strip => write!(f, "strip"),
            Self::Quote => write!(f, "quote"),
        }
    }
}

/// Options shared by all renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Comma handling for CSV output.
    pub comma_policy: CommaPolicy,
    /// Cell text conversion.
    pub formatter: CellFormatter,
}

impl RenderOptions {
    /// Sets the comma policy.
    #[must_use]
    pub const fn with_comma_policy(mut self, policy: CommaPolicy) -> Self {
        self.comma_policy = policy;
        self
    }

    /// Sets the cell formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: CellFormatter) -> Self {
        self.formatter = formatter;
        self
    }
}

/// Creates a renderer for the given format, writing the header section.
///
/// # Errors
///
/// Returns an error if the format cannot render documents.
pub fn create_renderer(
    format: Format,
    headers: &HeaderMap,
    options: &RenderOptions,
) -> Result<Box<dyn DocumentRenderer>> {
    match format {
        Format::Csv => match options.comma_policy {
            CommaPolicy::Strip => Ok(Box::new(csv::StrippedCsvRenderer::new(
                headers,
                options.formatter.clone(),
            ))),
            CommaPolicy::Quote => Ok(Box::new(csv::QuotedCsvRenderer::new(
                headers,
                options.formatter.clone(),
            )?)),
        },
        Format::ExcelHtml => Ok(Box::new(html::HtmlTableRenderer::new(
            headers,
            options.formatter.clone(),
        ))),
        Format::Json | Format::Yaml => Err(Error::InvalidInput(format!(
            "Format {format} does not support export"
        ))),
    }
}

/// Creates a row source for the given format and reader.
///
/// # Errors
///
/// Returns an error if the format cannot be read from.
pub fn create_row_source<R: BufRead + 'static>(
    reader: R,
    format: Format,
) -> Result<Box<dyn RowSource>> {
    match format {
        Format::Json => Ok(Box::new(json::JsonRowSource::new(reader))),
        Format::Yaml => Ok(Box::new(yaml::YamlRowSource::new(reader)?)),
        Format::Csv | Format::ExcelHtml => Err(Error::InvalidInput(format!(
            "Format {format} does not support import"
        ))),
    }
}
