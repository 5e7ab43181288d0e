//! Row input and document export.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`RowSource`] and [`DocumentRenderer`]
//! - **Services** orchestrate rendering and hand documents to a
//!   [`crate::delivery::DeliverySink`]
//!
//! # Supported Formats
//!
//! | Format | Input | Output | Notes |
//! |--------|-------|--------|-------|
//! | CSV | - | ✓ | CRLF lines, commas stripped or RFC 4180 quoted |
//! | Excel HTML | - | ✓ | HTML table served as `.xls` |
//! | JSON | ✓ | - | Array or newline-delimited objects |
//! | YAML | ✓ | - | Sequence or document stream |
//!
//! # Example
//!
//! ```rust
//! use rowexport::io::build_csv;
//! use rowexport::{HeaderMap, Row};
//!
//! let headers = HeaderMap::from_pairs([("glCode", "GL Code"), ("debit", "Debit")])?;
//! let rows = vec![Row::new().with("glCode", "4000").with("debit", 100)];
//! let doc = build_csv(&headers, Some(&rows))?.expect("rows present");
//! assert_eq!(doc.as_str(), "GL Code,Debit\r\n4000,100\r\n");
//! # Ok::<(), rowexport::Error>(())
//! ```

pub mod formats;
pub mod services;
pub mod traits;

// Re-exports for convenience
pub use formats::{CommaPolicy, Format, RenderOptions, create_renderer, create_row_source};
pub use services::{
    ActionOutcome, ExportAction, ExportOptions, ExportResult, ExportService, build_csv,
};
pub use traits::{DocumentRenderer, RowSource};
