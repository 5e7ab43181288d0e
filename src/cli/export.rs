//! Export CLI command.

use crate::config::RowExportConfig;
use crate::delivery::{DirectoryBlobSaver, HostCapabilities, WriterActivator, select_sink};
use crate::io::formats::{CommaPolicy, Format, create_row_source};
use crate::io::services::{ExportResult, ExportService};
use crate::models::HeaderMap;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Arguments for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    /// Row input file, or `-` for stdin.
    pub rows: PathBuf,
    /// Row input format; detected from the extension when absent.
    pub rows_format: Option<Format>,
    /// Header map file (JSON, YAML or TOML object).
    pub headers: Option<PathBuf>,
    /// Named header preset.
    pub preset: Option<String>,
    /// Document title.
    pub title: Option<String>,
    /// Output format.
    pub format: Option<Format>,
    /// Quote fields instead of stripping commas.
    pub quote: bool,
    /// Directory for saved files.
    pub out_dir: Option<PathBuf>,
    /// Write a data URI to stdout instead of saving a file.
    pub data_uri: bool,
}

/// Runs an export.
///
/// Returns `Ok(None)` when the input holds no rows.
///
/// # Errors
///
/// Returns an error if headers or rows cannot be read, or delivery fails.
#[instrument(skip_all, fields(rows = %args.rows.display()))]
pub fn cmd_export(
    args: &ExportArgs,
    config: &RowExportConfig,
    out: &mut dyn Write,
) -> Result<Option<ExportResult>> {
    let headers = resolve_headers(args)?;
    let rows = read_rows(&args.rows, args.rows_format)?;
    info!(columns = headers.len(), rows = rows.len(), "loaded export input");

    let mut options = config.export_options();
    if let Some(format) = args.format {
        options = options.with_format(format);
    }
    if args.quote {
        options.render.comma_policy = CommaPolicy::Quote;
    }

    let title = args.title.as_deref().or(config.title.as_deref());
    let out_dir = args.out_dir.as_ref().unwrap_or(&config.output_dir);

    let mut host = HostCapabilities::standard(Box::new(WriterActivator::new(out)));
    if !args.data_uri {
        host = host.with_blob_saver(Box::new(DirectoryBlobSaver::new(out_dir)));
    }
    let mut sink = select_sink(host);

    ExportService::new(options).export(&headers, Some(&rows), title, &mut sink)
}

/// Picks the header map from a file, a preset, or the accounting period
/// default.
fn resolve_headers(args: &ExportArgs) -> Result<HeaderMap> {
    match (&args.headers, &args.preset) {
        (Some(_), Some(_)) => Err(Error::InvalidInput(
            "--headers and --preset cannot be combined".to_string(),
        )),
        (Some(path), None) => load_headers(path),
        (None, Some(name)) => HeaderMap::preset(name)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown header preset: {name}"))),
        (None, None) => Ok(HeaderMap::accounting_period()),
    }
}

/// Loads a header map, choosing the parser from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or is empty.
pub fn load_headers(path: &Path) -> Result<HeaderMap> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_headers".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let headers: HeaderMap = match ext.as_deref() {
        Some("toml") => toml::from_str(&contents).map_err(|e| parse_error(path, &e))?,
        Some("yaml" | "yml") => {
            serde_yaml_ng::from_str(&contents).map_err(|e| parse_error(path, &e))?
        },
        _ => serde_json::from_str(&contents).map_err(|e| parse_error(path, &e))?,
    };

    if headers.is_empty() {
        return Err(Error::InvalidInput(format!(
            "{}: header map has no columns",
            path.display()
        )));
    }
    Ok(headers)
}

fn parse_error(path: &Path, e: &dyn std::fmt::Display) -> Error {
    Error::InvalidInput(format!("{}: failed to parse headers: {e}", path.display()))
}

/// Reads all rows from a file or stdin.
fn read_rows(path: &Path, format: Option<Format>) -> Result<Vec<crate::models::Row>> {
    let stdin = path.as_os_str() == "-";
    let format = match format {
        Some(format) => format,
        None if stdin => Format::Json,
        None => Format::from_path(path)?,
    };

    let mut source = if stdin {
        create_row_source(std::io::stdin().lock(), format)?
    } else {
        let file = File::open(path).map_err(|e| Error::OperationFailed {
            operation: "open_rows".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        create_row_source(BufReader::new(file), format)?
    };
    source.collect_rows()
}
