//! CSV document renderers.
//!
//! Two variants share the same line layout (`,` delimiter, `\r\n` after every
//! line including the last):
//!
//! - [`StrippedCsvRenderer`] removes commas from cell text and never quotes.
//! - [`QuotedCsvRenderer`] keeps commas and quotes fields per RFC 4180.

use crate::io::traits::DocumentRenderer;
use crate::models::{CellFormatter, HeaderMap, Row};
use crate::{Error, Result};

const COLUMN_DELIMITER: char = ',';
const LINE_DELIMITER: &str = "\r\n";

/// CSV renderer that strips commas from cell values.
///
/// Header labels are written as given.
pub struct StrippedCsvRenderer {
    keys: Vec<String>,
    formatter: CellFormatter,
    out: String,
}

impl StrippedCsvRenderer {
    /// Creates the renderer and writes the header line.
    #[must_use]
    pub fn new(headers: &HeaderMap, formatter: CellFormatter) -> Self {
        let mut out = String::new();
        push_line(&mut out, headers.labels());
        Self {
            keys: headers.keys().map(String::from).collect(),
            formatter,
            out,
        }
    }
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(COLUMN_DELIMITER);
        }
        out.push_str(field);
    }
    out.push_str(LINE_DELIMITER);
}

impl DocumentRenderer for StrippedCsvRenderer {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        let fields: Vec<String> = self
            .keys
            .iter()
            .map(|key| {
                self.formatter
                    .format(row.cell(key))
                    .replace(COLUMN_DELIMITER, "")
            })
            .collect();
        push_line(&mut self.out, fields.iter().map(String::as_str));
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<String> {
        Ok(self.out)
    }
}

/// CSV renderer that quotes fields containing delimiters, quotes or line
/// breaks.
pub struct QuotedCsvRenderer {
    keys: Vec<String>,
    formatter: CellFormatter,
    writer: csv::Writer<Vec<u8>>,
}

impl QuotedCsvRenderer {
    /// Creates the renderer and writes the header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the header record cannot be written.
    pub fn new(headers: &HeaderMap, formatter: CellFormatter) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false) // labels come from the header map
            .flexible(false)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());

        writer
            .write_record(headers.labels())
            .map_err(|e| csv_error("write_csv_headers", &e))?;

        Ok(Self {
            keys: headers.keys().map(String::from).collect(),
            formatter,
            writer,
        })
    }
}

impl DocumentRenderer for QuotedCsvRenderer {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        let fields: Vec<String> = self
            .keys
            .iter()
            .map(|key| self.formatter.format(row.cell(key)))
            .collect();
        self.writer
            .write_record(&fields)
            .map_err(|e| csv_error("write_csv", &e))
    }

    fn finalize(self: Box<Self>) -> Result<String> {
        let this = *self;
        let bytes = this.writer.into_inner().map_err(|e| Error::OperationFailed {
            operation: "flush_csv".to_string(),
            cause: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| Error::OperationFailed {
            operation: "flush_csv".to_string(),
            cause: e.to_string(),
        })
    }
}

fn csv_error(operation: &str, e: &csv::Error) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}
