//! Row export service.
//!
//! Renders a header map and rows into a [`Document`] and hands it to a
//! [`DeliverySink`].

use crate::Result;
use crate::delivery::{Artifact, DeliveryReceipt, DeliverySink};
use crate::io::formats::{Format, RenderOptions, create_renderer};
use crate::models::{CsvDocument, Document, HeaderMap, Row};
use tracing::{debug, info, instrument};

/// Options for row export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output format.
    pub format: Format,
    /// Renderer options.
    pub render: RenderOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: Format::Csv,
            render: RenderOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the renderer options.
    #[must_use]
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// Result of a delivered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Number of rows exported.
    pub exported: usize,
    /// Format used.
    pub format: Format,
    /// Delivery receipt.
    pub receipt: DeliveryReceipt,
}

/// Service for exporting rows.
///
/// Stateless apart from its options; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct ExportService {
    options: ExportOptions,
}

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    #[must_use]
    pub const fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Builds a CSV document.
    ///
    /// Returns `Ok(None)` when there are no rows to export. Every line,
    /// including the last, ends with `\r\n`. The configured comma policy and
    /// cell formatter apply; the configured format is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if the CSV writer fails.
    pub fn build_csv(&self, headers: &HeaderMap, rows: Option<&[Row]>) -> Result<Option<CsvDocument>> {
        render(Format::Csv, &self.options.render, headers, rows)
    }

    /// Builds a document in the configured format.
    ///
    /// Returns `Ok(None)` when there are no rows to export.
    ///
    /// # Errors
    ///
    /// Returns an error if the format cannot be rendered.
    pub fn build(&self, headers: &HeaderMap, rows: Option<&[Row]>) -> Result<Option<Document>> {
        render(self.options.format, &self.options.render, headers, rows)
    }

    /// Hands a document to a delivery sink.
    ///
    /// The filename is `title` plus the format extension; a missing or blank
    /// title becomes `export`. One attempt, no retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    #[instrument(skip(self, document, sink), fields(format = %document.format(), sink = %sink.kind()))]
    pub fn deliver(
        &self,
        document: Document,
        title: Option<&str>,
        sink: &mut dyn DeliverySink,
    ) -> Result<DeliveryReceipt> {
        let artifact = Artifact::from_document(document, title);
        let receipt = sink.deliver(&artifact)?;
        metrics::counter!("rowexport_deliveries_total", "variant" => receipt.kind.as_str())
            .increment(1);
        info!(
            filename = %receipt.filename,
            bytes = receipt.bytes,
            variant = %receipt.kind,
            "export delivered"
        );
        Ok(receipt)
    }

    /// Builds and delivers a document.
    ///
    /// Returns `Ok(None)` without touching the sink when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    #[instrument(skip_all, fields(columns = headers.len(), rows = rows.map_or(0, <[Row]>::len)))]
    pub fn export(
        &self,
        headers: &HeaderMap,
        rows: Option<&[Row]>,
        title: Option<&str>,
        sink: &mut dyn DeliverySink,
    ) -> Result<Option<ExportResult>> {
        let Some(document) = self.build(headers, rows)? else {
            debug!("nothing to export");
            return Ok(None);
        };
        let exported = document.row_count();
        let format = document.format();
        let receipt = self.deliver(document, title, sink)?;
        Ok(Some(ExportResult {
            exported,
            format,
            receipt,
        }))
    }
}

fn render(
    format: Format,
    options: &RenderOptions,
    headers: &HeaderMap,
    rows: Option<&[Row]>,
) -> Result<Option<Document>> {
    let Some(rows) = rows.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    let mut renderer = create_renderer(format, headers, options)?;
    for row in rows {
        renderer.write_row(row)?;
    }
    let body = renderer.finalize()?;

    metrics::counter!("rowexport_documents_built_total", "format" => format.extension())
        .increment(1);
    metrics::counter!("rowexport_rows_rendered_total").increment(rows.len() as u64);
    debug!(%format, rows = rows.len(), bytes = body.len(), "document rendered");

    Ok(Some(Document::new(format, body, rows.len())))
}

/// Builds a CSV document with default options.
///
/// Convenience for [`ExportService::build_csv`].
///
/// # Errors
///
/// Returns an error only if the CSV writer fails.
pub fn build_csv(headers: &HeaderMap, rows: Option<&[Row]>) -> Result<Option<CsvDocument>> {
    ExportService::default().build_csv(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{DeliveryKind, LegacySave, StandardDownload, WriterActivator};
    use crate::io::formats::{CommaPolicy, create_row_source};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemorySaver(Arc<Mutex<Vec<(String, Vec<u8>)>>>);

    impl crate::delivery::BlobSaver for MemorySaver {
        fn save_blob(&mut self, bytes: &[u8], filename: &str) -> Result<()> {
            self.0
                .lock()
                .unwrap()
                .push((filename.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    fn ledger_headers() -> HeaderMap {
        HeaderMap::from_pairs([("glCode", "GL Code"), ("debit", "Debit"), ("credit", "Credit")])
            .unwrap()
    }

    fn ledger_rows() -> Vec<Row> {
        vec![
            Row::new().with("glCode", "4000").with("debit", 100).with("credit", 0),
            Row::new().with("glCode", "2000").with("debit", 0).with("credit", 100),
        ]
    }

    #[test]
    fn test_build_csv_empty_rows_is_none() {
        let headers = ledger_headers();
        assert!(build_csv(&headers, Some(&[])).unwrap().is_none());
        assert!(build_csv(&headers, None).unwrap().is_none());
    }

    #[test]
    fn test_build_csv_ledger_scenario() {
        let doc = build_csv(&ledger_headers(), Some(&ledger_rows()))
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.as_str(),
            "GL Code,Debit,Credit\r\n4000,100,0\r\n2000,0,100\r\n"
        );
        assert_eq!(doc.row_count(), 2);
    }

    #[test]
    fn test_build_csv_strips_commas() {
        let headers = HeaderMap::from_pairs([("glCode", "GL Code")]).unwrap();
        let rows = [Row::new().with("glCode", "1,000")];
        let doc = build_csv(&headers, Some(&rows)).unwrap().unwrap();
        assert_eq!(doc.as_str(), "GL Code\r\n1000\r\n");
    }

    #[test]
    fn test_build_csv_json_amounts() {
        let input = r#"[{"glCode": "4000", "debit": 100.00, "credit": 1e21},
                        {"glCode": "2000", "debit": 12.50, "credit": -0.0}]"#;
        let rows = create_row_source(std::io::Cursor::new(input), Format::Json)
            .unwrap()
            .collect_rows()
            .unwrap();

        let doc = build_csv(&ledger_headers(), Some(&rows)).unwrap().unwrap();

        assert_eq!(
            doc.as_str(),
            "GL Code,Debit,Credit\r\n\
             4000,100,1000000000000000000000\r\n\
             2000,12.5,0\r\n"
        );
    }

    #[test]
    fn test_build_csv_missing_key() {
        let headers = HeaderMap::from_pairs([("a", "A"), ("b", "B")]).unwrap();
        let rows = [Row::new().with("a", "x")];
        let doc = build_csv(&headers, Some(&rows)).unwrap().unwrap();
        assert_eq!(doc.as_str(), "A,B\r\nx,\r\n");
    }

    #[test]
    fn test_build_csv_is_deterministic() {
        let headers = ledger_headers();
        let rows = ledger_rows();
        let first = build_csv(&headers, Some(&rows)).unwrap();
        let second = build_csv(&headers, Some(&rows)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_csv_ignores_configured_format() {
        let service = ExportService::new(ExportOptions::default().with_format(Format::ExcelHtml));
        let doc = service
            .build_csv(&ledger_headers(), Some(&ledger_rows()))
            .unwrap()
            .unwrap();
        assert_eq!(doc.format(), Format::Csv);
    }

    #[test]
    fn test_build_with_quote_policy() {
        let service = ExportService::new(ExportOptions::default().with_render(
            RenderOptions::default().with_comma_policy(CommaPolicy::Quote),
        ));
        let headers = HeaderMap::from_pairs([("glCode", "GL Code")]).unwrap();
        let rows = [Row::new().with("glCode", "1,000")];
        let doc = service.build(&headers, Some(&rows)).unwrap().unwrap();
        assert_eq!(doc.as_str(), "GL Code\r\n\"1,000\"\r\n");
    }

    #[test]
    fn test_build_excel_html() {
        let service = ExportService::new(ExportOptions::default().with_format(Format::ExcelHtml));
        let doc = service
            .build(&ledger_headers(), Some(&ledger_rows()))
            .unwrap()
            .unwrap();
        assert_eq!(doc.format(), Format::ExcelHtml);
        assert!(doc.as_str().starts_with("<table>"));
        assert!(doc.as_str().ends_with("</table>"));
        assert_eq!(doc.as_str().matches("<tr>").count(), 3);
    }

    #[test]
    fn test_deliver_default_filename() {
        let service = ExportService::default();
        let saver = MemorySaver::default();
        let mut sink = LegacySave::new(saver.clone());
        let doc = build_csv(&ledger_headers(), Some(&ledger_rows()))
            .unwrap()
            .unwrap();

        let receipt = service.deliver(doc, None, &mut sink).unwrap();

        assert_eq!(receipt.filename, "export.csv");
        assert_eq!(receipt.mime_type, "text/csv");
        assert_eq!(saver.0.lock().unwrap()[0].0, "export.csv");
    }

    #[test]
    fn test_deliver_empty_title_defaults() {
        let service = ExportService::default();
        let mut sink = LegacySave::new(MemorySaver::default());
        let doc = build_csv(&ledger_headers(), Some(&ledger_rows()))
            .unwrap()
            .unwrap();
        let receipt = service.deliver(doc, Some(""), &mut sink).unwrap();
        assert_eq!(receipt.filename, "export.csv");
    }

    #[test]
    fn test_export_delivers_once() {
        let service = ExportService::default();
        let saver = MemorySaver::default();
        let mut sink = LegacySave::new(saver.clone());

        let result = service
            .export(
                &ledger_headers(),
                Some(&ledger_rows()),
                Some("Accounting Period Export"),
                &mut sink,
            )
            .unwrap()
            .unwrap();

        assert_eq!(result.exported, 2);
        assert_eq!(result.receipt.filename, "Accounting Period Export.csv");
        let saved = saver.0.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].1,
            b"GL Code,Debit,Credit\r\n4000,100,0\r\n2000,0,100\r\n"
        );
    }

    #[test]
    fn test_export_without_rows_skips_sink() {
        let service = ExportService::default();
        let saver = MemorySaver::default();
        let mut sink = LegacySave::new(saver.clone());

        let result = service
            .export(&ledger_headers(), Some(&[]), Some("t"), &mut sink)
            .unwrap();

        assert!(result.is_none());
        assert!(saver.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_export_excel_via_standard_download() {
        let service = ExportService::new(ExportOptions::default().with_format(Format::ExcelHtml));
        let mut sink = StandardDownload::new(WriterActivator::new(Vec::new()));

        let result = service
            .export(
                &HeaderMap::journal_summary(),
                Some(&ledger_rows()),
                Some("Accounting Period Export"),
                &mut sink,
            )
            .unwrap()
            .unwrap();

        assert_eq!(result.receipt.kind, DeliveryKind::StandardDownload);
        assert_eq!(result.receipt.filename, "Accounting Period Export.xls");
        assert_eq!(result.receipt.mime_type, "application/vnd.ms-excel");
    }
}
