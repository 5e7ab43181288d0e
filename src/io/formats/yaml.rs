//! YAML row source.
//!
//! Accepts a single sequence of mappings, or a document stream with one
//! mapping per document.

use crate::io::traits::RowSource;
use crate::models::Row;
use crate::{Error, Result};
use std::io::BufRead;

/// YAML row source.
///
/// YAML requires full parsing, so all rows are read upfront.
pub struct YamlRowSource {
    rows: std::vec::IntoIter<Row>,
}

impl YamlRowSource {
    /// Creates a new YAML row source.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or YAML parsing fails.
    pub fn new<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::OperationFailed {
                operation: "read_yaml".to_string(),
                cause: e.to_string(),
            })?;

        if content.trim().is_empty() {
            return Ok(Self {
                rows: Vec::new().into_iter(),
            });
        }

        // Try parsing as a sequence first
        if let Ok(rows) = serde_yaml_ng::from_str::<Vec<Row>>(&content) {
            return Ok(Self {
                rows: rows.into_iter(),
            });
        }

        let mut rows = Vec::new();
        for (doc_index, document) in serde_yaml_ng::Deserializer::from_str(&content).enumerate() {
            let row: Row = serde::Deserialize::deserialize(document).map_err(|e| {
                Error::InvalidInput(format!(
                    "Document {}: Failed to parse YAML: {e}",
                    doc_index + 1
                ))
            })?;
            rows.push(row);
        }

        Ok(Self {
            rows: rows.into_iter(),
        })
    }
}

impl RowSource for YamlRowSource {
    fn next(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.next())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.rows.len())
    }
}
