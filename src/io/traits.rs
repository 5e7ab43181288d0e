//! Core traits for row input and document rendering.
//!
//! Defines the [`RowSource`] and [`DocumentRenderer`] traits that format
//! adapters implement.

use crate::Result;
use crate::models::Row;

/// Source of rows to export.
///
/// Implementations read rows from a specific format (JSON, YAML) and yield
/// them one at a time.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl RowSource for JsonRowSource {
///     fn next(&mut self) -> Result<Option<Row>> {
///         // Read next line, parse JSON object, return row
///     }
/// }
/// ```
pub trait RowSource {
    /// Reads the next row.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O errors occur.
    fn next(&mut self) -> Result<Option<Row>>;

    /// Returns an estimate of the total number of rows, if known.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Drains the source into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`RowSource::next`].
    fn collect_rows(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(self.size_hint().unwrap_or(0));
        while let Some(row) = self.next()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Renders rows into document text.
///
/// # Lifecycle
///
/// 1. Create the renderer for a header map (writes the header section)
/// 2. Call `write_row()` for each row
/// 3. Call `finalize()` to close the document and take the text
pub trait DocumentRenderer {
    /// Renders one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn write_row(&mut self, row: &Row) -> Result<()>;

    /// Writes any footer and returns the complete document text.
    ///
    /// This method consumes the renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn finalize(self: Box<Self>) -> Result<String>;
}
