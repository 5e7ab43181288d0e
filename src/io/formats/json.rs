//! JSON row source.
//!
//! Accepts both a JSON array of row objects and newline-delimited JSON
//! (NDJSON/JSONL).

use crate::io::traits::RowSource;
use crate::models::Row;
use crate::{Error, Result};
use std::io::BufRead;

/// Input layout, decided by the first non-blank line.
enum Layout {
    /// Nothing read yet.
    Unknown,
    /// Whole input was a JSON array; rows are drained from here.
    Array(std::vec::IntoIter<Row>),
    /// One object per line.
    Lines,
}

/// JSON row source.
///
/// A first non-blank line starting with `[` means the whole input is one
/// array. Anything else is read as NDJSON, skipping blank lines.
pub struct JsonRowSource<R: BufRead> {
    reader: R,
    layout: Layout,
    /// 1-based number of the last line read.
    line: usize,
}

fn read_error(e: &std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "read_json".to_string(),
        cause: e.to_string(),
    }
}

impl<R: BufRead> JsonRowSource<R> {
    /// Creates a new JSON row source.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            layout: Layout::Unknown,
            line: 0,
        }
    }

    fn read_nonblank(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        while self.reader.read_line(&mut buf).map_err(|e| read_error(&e))? > 0 {
            self.line += 1;
            if !buf.trim().is_empty() {
                return Ok(Some(buf));
            }
            buf.clear();
        }
        Ok(None)
    }

    fn parse_object(&self, text: &str) -> Result<Row> {
        serde_json::from_str(text.trim()).map_err(|e| {
            Error::InvalidInput(format!("Line {}: Failed to parse JSON object: {e}", self.line))
        })
    }

    /// Reads the first line and fixes the layout. Returns the first NDJSON
    /// row, if the input is line-delimited.
    fn detect(&mut self) -> Result<Option<Row>> {
        let Some(first) = self.read_nonblank()? else {
            self.layout = Layout::Lines;
            return Ok(None);
        };
        if !first.trim_start().starts_with('[') {
            self.layout = Layout::Lines;
            return self.parse_object(&first).map(Some);
        }

        let mut text = first;
        self.reader
            .read_to_string(&mut text)
            .map_err(|e| read_error(&e))?;
        let rows: Vec<Row> = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse JSON array: {e}")))?;
        let mut rows = rows.into_iter();
        let first_row = rows.next();
        self.layout = Layout::Array(rows);
        Ok(first_row)
    }
}

impl<R: BufRead> RowSource for JsonRowSource<R> {
    fn next(&mut self) -> Result<Option<Row>> {
        match &mut self.layout {
            Layout::Unknown => self.detect(),
            Layout::Array(rows) => Ok(rows.next()),
            Layout::Lines => match self.read_nonblank()? {
                Some(text) => self.parse_object(&text).map(Some),
                None => Ok(None),
            },
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match &self.layout {
            Layout::Array(rows) => Some(rows.len()),
            Layout::Unknown | Layout::Lines => None,
        }
    }
}
