//! Export action orchestration.
//!
//! Mirrors a one-click "export this record" action: guard against double
//! invocation, fetch rows, export, and log fetch failures instead of
//! propagating them.

use super::export::{ExportResult, ExportService};
use crate::Result;
use crate::delivery::DeliverySink;
use crate::io::formats::Format;
use crate::models::{HeaderMap, Row};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, instrument, warn};

/// Outcome of [`ExportAction::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Rows were exported and delivered.
    Delivered(ExportResult),
    /// The fetch returned no rows; nothing was delivered.
    NothingToExport,
    /// Another invocation was still running; nothing was fetched.
    AlreadyRunning,
    /// The row fetch failed. The message has already been logged.
    FetchFailed(String),
}

/// A configured export bound to a header map and title.
pub struct ExportAction {
    headers: HeaderMap,
    title: Option<String>,
    service: ExportService,
    executing: AtomicBool,
}

/// Clears the executing flag when dropped.
struct ExecutingGuard<'a>(&'a AtomicBool);

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportAction {
    /// Creates an action.
    #[must_use]
    pub fn new(headers: HeaderMap, title: Option<String>, service: ExportService) -> Self {
        Self {
            headers,
            title,
            service,
            executing: AtomicBool::new(false),
        }
    }

    /// Column definitions.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Title used for the delivered filename.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Output format, taken from the service options.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.service.options().format
    }

    /// Returns whether an invocation is in progress.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::Acquire)
    }

    /// Fetches rows and exports them.
    ///
    /// A concurrent second call returns [`ActionOutcome::AlreadyRunning`]
    /// without calling `fetch`. Fetch errors are logged and reported as
    /// [`ActionOutcome::FetchFailed`]; they are never retried.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    #[instrument(skip_all, fields(title = self.title.as_deref().unwrap_or_default()))]
    pub fn invoke<F, E>(&self, fetch: F, sink: &mut dyn DeliverySink) -> Result<ActionOutcome>
    where
        F: FnOnce() -> std::result::Result<Vec<Row>, E>,
        E: Display,
    {
        if self
            .executing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("export already running");
            return Ok(ActionOutcome::AlreadyRunning);
        }
        let _guard = ExecutingGuard(&self.executing);

        let rows = match fetch() {
            Ok(rows) => rows,
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "failed to fetch export rows");
                return Ok(ActionOutcome::FetchFailed(message));
            },
        };
        info!(rows = rows.len(), "fetched export rows");

        let outcome = self
            .service
            .export(&self.headers, Some(&rows), self.title.as_deref(), sink)?
            .map_or(ActionOutcome::NothingToExport, ActionOutcome::Delivered);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{BlobSaver, LegacySave};
    use crate::io::services::ExportOptions;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingSaver(Arc<Mutex<usize>>);

    impl BlobSaver for CountingSaver {
        fn save_blob(&mut self, _bytes: &[u8], _filename: &str) -> Result<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn action() -> ExportAction {
        ExportAction::new(
            HeaderMap::accounting_period(),
            Some("Accounting Period Export".to_string()),
            ExportService::default(),
        )
    }

    #[test]
    fn test_invoke_delivers() {
        let saver = CountingSaver::default();
        let mut sink = LegacySave::new(saver.clone());
        let rows = vec![Row::new().with("glCode", "4000").with("debit", 100)];

        let outcome = action()
            .invoke(|| Ok::<_, String>(rows), &mut sink)
            .unwrap();

        match outcome {
            ActionOutcome::Delivered(result) => {
                assert_eq!(result.exported, 1);
                assert_eq!(result.receipt.filename, "Accounting Period Export.csv");
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(*saver.0.lock().unwrap(), 1);
    }

    #[test]
    fn test_action_accessors() {
        let action = ExportAction::new(
            HeaderMap::journal_summary(),
            None,
            ExportService::new(ExportOptions::default().with_format(Format::ExcelHtml)),
        );
        assert_eq!(action.format(), Format::ExcelHtml);
        assert_eq!(action.title(), None);
        assert_eq!(action.headers().len(), 3);
        assert_eq!(self::action().format(), Format::Csv);
        assert_eq!(self::action().title(), Some("Accounting Period Export"));
    }

    #[test]
    fn test_invoke_fetch_failure_is_reported() {
        let saver = CountingSaver::default();
        let mut sink = LegacySave::new(saver.clone());
        let action = action();

        let outcome = action
            .invoke(|| Err::<Vec<Row>, _>("controller unavailable"), &mut sink)
            .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::FetchFailed("controller unavailable".to_string())
        );
        assert_eq!(*saver.0.lock().unwrap(), 0);
        assert!(!action.is_executing());
    }

    #[test]
    fn test_invoke_empty_rows() {
        let mut sink = LegacySave::new(CountingSaver::default());
        let outcome = action()
            .invoke(|| Ok::<_, String>(Vec::new()), &mut sink)
            .unwrap();
        assert_eq!(outcome, ActionOutcome::NothingToExport);
    }

    #[test]
    fn test_invoke_guard_blocks_reentry() {
        let action = action();
        let saver = CountingSaver::default();
        let mut outer_sink = LegacySave::new(saver.clone());
        let mut inner_sink = LegacySave::new(saver.clone());
        let mut inner_outcome = None;

        let outer = action
            .invoke(
                || {
                    inner_outcome = Some(
                        action
                            .invoke(|| Ok::<_, String>(vec![Row::new()]), &mut inner_sink)
                            .unwrap(),
                    );
                    Ok::<_, String>(vec![Row::new().with("glCode", "1")])
                },
                &mut outer_sink,
            )
            .unwrap();

        assert_eq!(inner_outcome, Some(ActionOutcome::AlreadyRunning));
        assert!(matches!(outer, ActionOutcome::Delivered(_)));
        assert_eq!(*saver.0.lock().unwrap(), 1);
        assert!(!action.is_executing());
    }
}
