//! Rendered export documents.

use crate::io::formats::Format;

/// A rendered export document ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    format: Format,
    body: String,
    rows: usize,
}

/// A document rendered in [`Format::Csv`].
pub type CsvDocument = Document;

impl Document {
    /// Wraps rendered text.
    #[must_use]
    pub const fn new(format: Format, body: String, rows: usize) -> Self {
        Self { format, body, rows }
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Number of data rows rendered (header excluded).
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Consumes the document, returning the text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.body
    }

    /// Suggested filename for `title`.
    ///
    /// A blank title falls back to `export`.
    #[must_use]
    pub fn filename(&self, title: Option<&str>) -> String {
        filename_for(title, self.format)
    }
}

/// Default base name used when no title is given.
pub const DEFAULT_TITLE: &str = "export";

/// Builds `<title>.<extension>`, defaulting the title to [`DEFAULT_TITLE`].
///
/// A missing or whitespace-only title uses the default. Any other title is
/// kept as given, except that path separators become `_` so the name is
/// always a single path component.
#[must_use]
pub fn filename_for(title: Option<&str>, format: Format) -> String {
    let base: String = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{base}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_defaults() {
        assert_eq!(filename_for(None, Format::Csv), "export.csv");
        assert_eq!(filename_for(Some(""), Format::Csv), "export.csv");
        assert_eq!(filename_for(Some("   "), Format::ExcelHtml), "export.xls");
    }

    #[test]
    fn test_filename_with_title() {
        assert_eq!(
            filename_for(Some("Accounting Period Export"), Format::Csv),
            "Accounting Period Export.csv"
        );
    }

    #[test]
    fn test_filename_keeps_title_as_given() {
        assert_eq!(filename_for(Some(" Ledger "), Format::Csv), " Ledger .csv");
    }

    #[test]
    fn test_filename_replaces_path_separators() {
        assert_eq!(
            filename_for(Some("Q1/2024 Export"), Format::Csv),
            "Q1_2024 Export.csv"
        );
        assert_eq!(filename_for(Some("..\\up"), Format::ExcelHtml), ".._up.xls");
    }

    #[test]
    fn test_document_accessors() {
        let doc = Document::new(Format::Csv, "A\r\n1\r\n".to_string(), 1);
        assert_eq!(doc.format(), Format::Csv);
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.filename(Some("t")), "t.csv");
        assert_eq!(doc.into_string(), "A\r\n1\r\n");
    }
}
