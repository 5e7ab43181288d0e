//! Export service implementations.
//!
//! Orchestrates rendering and delivery.

pub mod action;
pub mod export;

pub use action::{ActionOutcome, ExportAction};
pub use export::{ExportOptions, ExportResult, ExportService, build_csv};
