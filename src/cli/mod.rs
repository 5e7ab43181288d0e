//! CLI command implementations.
//!
//! Each submodule implements one command. Commands write their output to a
//! caller-supplied writer so they can be exercised without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `export` | Render rows as CSV or Excel HTML and deliver the document |
//! | `formats` | List input and output formats |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Save ledger rows as Ledger.csv in ./out
//! rowexport export --rows rows.json --preset journal-summary --title Ledger --out-dir out
//!
//! # Print a data URI instead of saving
//! rowexport export --rows rows.json --data-uri
//!
//! # Excel HTML with headers from a file
//! rowexport export --rows rows.yaml --headers headers.toml --format xls
//! ```

mod config;
mod export;
mod formats;

pub use config::{cmd_config, write_config};
pub use export::{ExportArgs, cmd_export, load_headers};
pub use formats::{FormatInfo, cmd_formats, get_all_formats};
