//! Standard anchor download via data URI.

use super::{Artifact, DeliveryKind, DeliveryReceipt, DeliverySink};
use crate::io::formats::Format;
use crate::{Error, Result};
use std::io::Write;
use tracing::debug;

/// A download link ready to be activated by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAnchor {
    /// Data URI carrying the document.
    pub href: String,
    /// Browsing context target (`_blank` or `_self`).
    pub target: &'static str,
    /// Suggested filename.
    pub download: String,
}

impl DownloadAnchor {
    /// Builds the anchor for an artifact.
    #[must_use]
    pub fn for_artifact(artifact: &Artifact) -> Self {
        let target = match artifact.format {
            Format::ExcelHtml => "_self",
            Format::Csv | Format::Json | Format::Yaml => "_blank",
        };
        Self {
            href: data_uri(artifact),
            target,
            download: artifact.filename.clone(),
        }
    }
}

/// Encodes an artifact as a `data:` URI.
///
/// Text formats carry an explicit UTF-8 charset; the Excel HTML variant is
/// sent with its bare MIME type.
#[must_use]
pub fn data_uri(artifact: &Artifact) -> String {
    let encoded = urlencoding::encode(&artifact.body);
    match artifact.format {
        Format::ExcelHtml => format!("data:{},{encoded}", artifact.mime_type()),
        Format::Csv | Format::Json | Format::Yaml => {
            format!("data:{};charset=utf-8,{encoded}", artifact.mime_type())
        },
    }
}

/// Host capability that activates a download anchor.
pub trait AnchorActivator {
    /// Activates the anchor, starting the download.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot activate the anchor.
    fn activate(&mut self, anchor: &DownloadAnchor) -> Result<()>;
}

impl<T: AnchorActivator + ?Sized> AnchorActivator for Box<T> {
    fn activate(&mut self, anchor: &DownloadAnchor) -> Result<()> {
        (**self).activate(anchor)
    }
}

/// Delivery through an [`AnchorActivator`].
pub struct StandardDownload<A: AnchorActivator> {
    activator: A,
}

impl<A: AnchorActivator> StandardDownload<A> {
    /// Wraps an anchor activator.
    #[must_use]
    pub const fn new(activator: A) -> Self {
        Self { activator }
    }
}

impl<A: AnchorActivator> DeliverySink for StandardDownload<A> {
    fn deliver(&mut self, artifact: &Artifact) -> Result<DeliveryReceipt> {
        let anchor = DownloadAnchor::for_artifact(artifact);
        debug!(
            download = %anchor.download,
            target = anchor.target,
            href_len = anchor.href.len(),
            "activating download anchor"
        );
        self.activator.activate(&anchor)?;
        Ok(DeliveryReceipt::new(DeliveryKind::StandardDownload, artifact))
    }

    fn kind(&self) -> DeliveryKind {
        DeliveryKind::StandardDownload
    }
}

/// Activates anchors by writing their `href` as a line to a writer.
///
/// Lets a terminal user paste the link into a browser.
pub struct WriterActivator<W: Write> {
    writer: W,
}

impl<W: Write> WriterActivator<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AnchorActivator for WriterActivator<W> {
    fn activate(&mut self, anchor: &DownloadAnchor) -> Result<()> {
        writeln!(self.writer, "{}", anchor.href)
            .and_then(|()| self.writer.flush())
            .map_err(|e| Error::OperationFailed {
                operation: "write_data_uri".to_string(),
                cause: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(format: Format, body: &str) -> Artifact {
        Artifact {
            filename: format!("export.{}", format.extension()),
            format,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_csv_data_uri() {
        let uri = data_uri(&artifact(Format::Csv, "GL Code,Debit\r\n"));
        assert_eq!(uri, "data:text/csv;charset=utf-8,GL%20Code%2CDebit%0D%0A");
    }

    #[test]
    fn test_excel_data_uri() {
        let uri = data_uri(&artifact(Format::ExcelHtml, "<table></table>"));
        assert_eq!(
            uri,
            "data:application/vnd.ms-excel,%3Ctable%3E%3C%2Ftable%3E"
        );
    }

    #[test]
    fn test_anchor_targets() {
        let csv = DownloadAnchor::for_artifact(&artifact(Format::Csv, "x"));
        assert_eq!(csv.target, "_blank");
        assert_eq!(csv.download, "export.csv");

        let xls = DownloadAnchor::for_artifact(&artifact(Format::ExcelHtml, "x"));
        assert_eq!(xls.target, "_self");
        assert_eq!(xls.download, "export.xls");
    }

    #[test]
    fn test_writer_activator_delivery() {
        let mut sink = StandardDownload::new(WriterActivator::new(Vec::new()));
        let receipt = sink.deliver(&artifact(Format::Csv, "a\r\n")).unwrap();

        assert_eq!(receipt.kind, DeliveryKind::StandardDownload);
        assert_eq!(receipt.mime_type, "text/csv");
        let written = String::from_utf8(sink.activator.into_inner()).unwrap();
        assert_eq!(written, "data:text/csv;charset=utf-8,a%0D%0A\n");
    }
}
