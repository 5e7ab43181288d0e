//! CLI command for listing supported formats.

use crate::io::formats::Format;
use serde::Serialize;
use std::io::{self, Write};

/// Information about a format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    /// Format name.
    pub name: String,
    /// File extension.
    pub extension: &'static str,
    /// MIME type.
    pub mime_type: &'static str,
    /// Usable as row input.
    pub import: bool,
    /// Usable as document output.
    pub export: bool,
}

impl FormatInfo {
    fn new(format: Format) -> Self {
        Self {
            name: format.to_string(),
            extension: format.extension(),
            mime_type: format.mime_type(),
            import: format.supports_import(),
            export: format.supports_export(),
        }
    }
}

/// Returns information for every format, outputs first.
#[must_use]
pub fn get_all_formats() -> Vec<FormatInfo> {
    Format::export_formats()
        .into_iter()
        .chain(Format::import_formats())
        .map(FormatInfo::new)
        .collect()
}

/// Writes formats as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write + ?Sized>(writer: &mut W, formats: &[FormatInfo]) -> io::Result<()> {
    writeln!(writer, "{:<8}{:<8}{:<28}DIRECTION", "FORMAT", "EXT", "MIME TYPE")?;
    for info in formats {
        let direction = match (info.import, info.export) {
            (true, true) => "input, output",
            (true, false) => "input",
            (false, true) => "output",
            (false, false) => "-",
        };
        writeln!(
            writer,
            "{:<8}{:<8}{:<28}{direction}",
            info.name, info.extension, info.mime_type
        )?;
    }
    Ok(())
}

/// Writes formats as JSON to the given writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write + ?Sized>(
    writer: &mut W,
    formats: &[FormatInfo],
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(formats)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the formats command.
///
/// # Errors
///
/// Returns an error if serialization or output fails.
pub fn cmd_formats(json: bool, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let formats = get_all_formats();
    if json {
        write_json(out, &formats)
    } else {
        write_table(out, &formats)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_formats() {
        let formats = get_all_formats();
        assert_eq!(formats.len(), 4);
        assert_eq!(formats[0].name, "csv");
        assert!(formats[0].export);
        assert!(!formats[0].import);
        assert_eq!(formats[1].mime_type, "application/vnd.ms-excel");
        assert!(formats.iter().any(|f| f.name == "json" && f.import));
    }

    #[test]
    fn test_write_table() {
        let mut buf = Vec::new();
        write_table(&mut buf, &get_all_formats()).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.starts_with("FORMAT"));
        assert!(output.contains("text/csv"));
        assert!(output.contains("xls"));
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn test_cmd_formats_json() {
        let mut buf = Vec::new();
        cmd_formats(true, &mut buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(4));
    }
}
