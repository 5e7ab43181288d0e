//! Config CLI command.

use crate::config::{RowExportConfig, default_config_path};
use std::io::{self, Write};

/// Writes the effective configuration.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_config<W: Write + ?Sized>(writer: &mut W, config: &RowExportConfig) -> io::Result<()> {
    writeln!(writer, "Current Configuration")?;
    writeln!(writer, "=====================")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Title: {}",
        config.title.as_deref().unwrap_or("(default: export)")
    )?;
    writeln!(writer, "Format: {}", config.format)?;
    writeln!(writer, "Comma Policy: {}", config.comma_policy)?;
    writeln!(writer, "Missing Cell Text: {:?}", config.missing_text)?;
    writeln!(writer, "Null Cell Text: {:?}", config.null_text)?;
    writeln!(writer, "Output Directory: {}", config.output_dir.display())?;
    writeln!(writer)?;
    writeln!(writer, "Logging:")?;
    writeln!(
        writer,
        "  Level: {}",
        config.logging.level.as_deref().unwrap_or("(default)")
    )?;
    writeln!(
        writer,
        "  Format: {}",
        config.logging.format.as_deref().unwrap_or("pretty")
    )?;
    Ok(())
}

/// Executes the config command.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn cmd_config(config: &RowExportConfig, show: bool, out: &mut dyn Write) -> io::Result<()> {
    if show {
        write_config(out, config)
    } else {
        writeln!(out, "Use --show to display configuration")?;
        if let Some(path) = default_config_path() {
            writeln!(out, "Config file: {}", path.display())?;
        }
        Ok(())
    }
}
