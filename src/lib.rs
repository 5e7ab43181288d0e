//! # Rowexport
//!
//! Exports tabular rows as CSV or legacy Excel HTML and hands the result to a
//! delivery sink.
//!
//! Rows are schemaless records keyed by field name. A [`HeaderMap`] selects,
//! orders and labels the exported columns.
//!
//! ## Features
//!
//! - CSV with CRLF line endings; commas stripped (default) or RFC 4180 quoted
//! - HTML table output served as `application/vnd.ms-excel` (`.xls`)
//! - Delivery through a legacy save-blob capability or a data-URI download
//!   anchor, selected from explicit host capabilities
//! - JSON and YAML row input
//!
//! ## Example
//!
//! ```rust
//! use rowexport::delivery::{DirectoryBlobSaver, LegacySave};
//! use rowexport::io::ExportService;
//! use rowexport::{HeaderMap, Row};
//!
//! let dir = tempfile::tempdir()?;
//! let headers = HeaderMap::journal_summary();
//! let rows = vec![Row::new().with("glCode", "4000").with("debit", 100).with("credit", 0)];
//! let mut sink = LegacySave::new(DirectoryBlobSaver::new(dir.path()));
//!
//! let result = ExportService::default()
//!     .export(&headers, Some(&rows), Some("Ledger"), &mut sink)?
//!     .expect("rows present");
//! assert_eq!(result.receipt.filename, "Ledger.csv");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod delivery;
pub mod io;
pub mod models;
pub mod observability;

// Re-exports for convenience
pub use config::RowExportConfig;
pub use delivery::{Artifact, DeliveryKind, DeliveryReceipt, DeliverySink};
pub use io::{ExportService, Format};
pub use models::{CellValue, CsvDocument, Document, HeaderMap, Row};

/// Error type for rowexport operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// Having no rows to export is not an error; builders return `Ok(None)`.
/// Malformed rows degrade to cell text and never fail an export.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Duplicate header keys, unknown format names, unparsable row input |
/// | `OperationFailed` | I/O errors, delivery capability failures, config read errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for rowexport operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "save_blob".to_string(),
            cause: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'save_blob' failed: disk full");
    }
}
