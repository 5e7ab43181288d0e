//! Data models for row export.
//!
//! | Type | Role |
//! |------|------|
//! | [`HeaderMap`] | Ordered field key to label mapping; defines columns |
//! | [`Row`] | Schemaless record keyed by field name |
//! | [`CellValue`] | Typed view of a single cell |
//! | [`Document`] | Rendered output plus its format |

mod document;
mod header;
mod row;

pub use document::{CsvDocument, DEFAULT_TITLE, Document, filename_for};
pub use header::{Column, HeaderMap};
pub use row::{CellFormatter, CellValue, Row};
