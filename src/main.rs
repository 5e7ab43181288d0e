//! Binary entry point for rowexport.
//!
//! This binary provides the CLI interface for exporting rows as CSV or
//! Excel HTML documents.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use rowexport::cli::{ExportArgs, cmd_config, cmd_export, cmd_formats};
use rowexport::config::{RowExportConfig, parse_export_format};
use rowexport::io::Format;
use rowexport::observability::{self, InitOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Rowexport - export tabular rows as CSV or Excel HTML.
#[derive(Parser)]
#[command(name = "rowexport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Export rows and deliver the document.
    Export {
        /// Row input file (JSON or YAML), or `-` for stdin.
        #[arg(short, long)]
        rows: PathBuf,

        /// Row input format: json or yaml (default: from extension).
        #[arg(long)]
        rows_format: Option<String>,

        /// Header map file (JSON, YAML or TOML object of key = label).
        #[arg(long)]
        headers: Option<PathBuf>,

        /// Header preset: accounting-period or journal-summary.
        #[arg(short, long)]
        preset: Option<String>,

        /// Document title, used as the file base name.
        #[arg(short, long)]
        title: Option<String>,

        /// Output format: csv or xls.
        #[arg(short, long)]
        format: Option<String>,

        /// Quote fields containing commas instead of stripping them.
        #[arg(long)]
        quote: bool,

        /// Directory to save the document in.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print a data URI download link instead of saving a file.
        #[arg(long)]
        data_uri: bool,
    },

    /// List supported formats.
    Formats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) =
        observability::init_from_config(&config.logging, InitOptions { verbose: cli.verbose })
    {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(
    command: Commands,
    config: &RowExportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Export {
            rows,
            rows_format,
            headers,
            preset,
            title,
            format,
            quote,
            out_dir,
            data_uri,
        } => {
            let args = ExportArgs {
                rows,
                rows_format: rows_format.as_deref().map(Format::from_str).transpose()?,
                headers,
                preset,
                title,
                format: format.as_deref().map(parse_export_format).transpose()?,
                quote,
                out_dir,
                data_uri,
            };
            run_export(&args, config, &mut out)
        },

        Commands::Formats { json } => cmd_formats(json, &mut out),

        Commands::Config { show } => Ok(cmd_config(config, show, &mut out)?),
    }
}

/// Runs an export and reports the result on stderr.
fn run_export(
    args: &ExportArgs,
    config: &RowExportConfig,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd_export(args, config, out)? {
        Some(result) => {
            out.flush()?;
            eprintln!(
                "Exported {} rows to {} ({}, {} bytes)",
                result.exported, result.receipt.filename, result.receipt.kind, result.receipt.bytes
            );
        },
        None => eprintln!("No rows to export"),
    }
    Ok(())
}

/// Loads configuration from `path` or the default location, then applies
/// environment overrides.
fn load_config(
    path: Option<&std::path::Path>,
) -> Result<RowExportConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => RowExportConfig::load_from_file(path)?,
        None => RowExportConfig::load_default()?,
    };
    config.apply_env_overrides()?;
    Ok(config)
}
