//! Delivery of rendered documents to the user.
//!
//! A [`DeliverySink`] turns an [`Artifact`] (bytes, suggested filename, MIME
//! type) into something the user can open. Two variants exist:
//!
//! | Variant | Capability used | Mechanism |
//! |---------|-----------------|-----------|
//! | [`LegacySave`] | [`BlobSaver`] | Saves raw bytes under the filename |
//! | [`StandardDownload`] | [`AnchorActivator`] | Activates a data-URI download anchor |
//!
//! The host describes what it can do through [`HostCapabilities`];
//! [`select_sink`] picks the variant. Each delivery is attempted exactly once.

mod legacy;
mod standard;

pub use legacy::{BlobSaver, DirectoryBlobSaver, LegacySave};
pub use standard::{AnchorActivator, DownloadAnchor, StandardDownload, WriterActivator, data_uri};

use crate::Result;
use crate::io::formats::Format;
use crate::models::{Document, filename_for};
use std::fmt;

/// A document packaged for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested filename including extension.
    pub filename: String,
    /// Format of the body.
    pub format: Format,
    /// Document text (UTF-8, no BOM).
    pub body: String,
}

impl Artifact {
    /// Packages a document under `title`.
    ///
    /// A missing or blank title becomes `export`.
    #[must_use]
    pub fn from_document(document: Document, title: Option<&str>) -> Self {
        let format = document.format();
        Self {
            filename: filename_for(title, format),
            format,
            body: document.into_string(),
        }
    }

    /// MIME type of the body.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Body as bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }
}

/// Which delivery variant handled an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryKind {
    /// Raw bytes handed to a blob saver.
    LegacySave,
    /// Data-URI anchor activated.
    StandardDownload,
}

impl DeliveryKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LegacySave => "legacy_save",
            Self::StandardDownload => "standard_download",
        }
    }
}

impl fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Variant that delivered the artifact.
    pub kind: DeliveryKind,
    /// Final filename.
    pub filename: String,
    /// MIME type delivered.
    pub mime_type: &'static str,
    /// Size of the delivered body in bytes.
    pub bytes: usize,
}

impl DeliveryReceipt {
    /// Builds a receipt for `artifact`.
    #[must_use]
    pub fn new(kind: DeliveryKind, artifact: &Artifact) -> Self {
        Self {
            kind,
            filename: artifact.filename.clone(),
            mime_type: artifact.mime_type(),
            bytes: artifact.body.len(),
        }
    }
}

/// Boundary capability that makes an artifact available to the user.
pub trait DeliverySink {
    /// Delivers one artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the host capability fails. Delivery is not retried.
    fn deliver(&mut self, artifact: &Artifact) -> Result<DeliveryReceipt>;

    /// Variant implemented by this sink.
    fn kind(&self) -> DeliveryKind;
}

impl<T: DeliverySink + ?Sized> DeliverySink for Box<T> {
    fn deliver(&mut self, artifact: &Artifact) -> Result<DeliveryReceipt> {
        (**self).deliver(artifact)
    }

    fn kind(&self) -> DeliveryKind {
        (**self).kind()
    }
}

/// Capabilities offered by the host environment.
pub struct HostCapabilities<'a> {
    /// Legacy save-blob capability, if the host has one.
    pub blob_saver: Option<Box<dyn BlobSaver + 'a>>,
    /// Anchor activation capability.
    pub activator: Box<dyn AnchorActivator + 'a>,
}

impl<'a> HostCapabilities<'a> {
    /// Host that only supports anchor downloads.
    #[must_use]
    pub fn standard(activator: Box<dyn AnchorActivator + 'a>) -> Self {
        Self {
            blob_saver: None,
            activator,
        }
    }

    /// Adds a legacy save-blob capability.
    #[must_use]
    pub fn with_blob_saver(mut self, saver: Box<dyn BlobSaver + 'a>) -> Self {
        self.blob_saver = Some(saver);
        self
    }
}

/// Picks the delivery variant for a host.
///
/// Legacy save is preferred when available; otherwise the standard anchor
/// download is used.
#[must_use]
pub fn select_sink<'a>(host: HostCapabilities<'a>) -> Box<dyn DeliverySink + 'a> {
    match host.blob_saver {
        Some(saver) => Box::new(LegacySave::new(saver)),
        None => Box::new(StandardDownload::new(host.activator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl BlobSaver for Recorder {
        fn save_blob(&mut self, _bytes: &[u8], filename: &str) -> Result<()> {
            self.0.lock().unwrap().push(format!("blob:{filename}"));
            Ok(())
        }
    }

    impl AnchorActivator for Recorder {
        fn activate(&mut self, anchor: &DownloadAnchor) -> Result<()> {
            self.0.lock().unwrap().push(format!("anchor:{}", anchor.download));
            Ok(())
        }
    }

    fn artifact() -> Artifact {
        let doc = Document::new(Format::Csv, "A\r\n1\r\n".to_string(), 1);
        Artifact::from_document(doc, Some("Report"))
    }

    #[test]
    fn test_artifact_from_document() {
        let artifact = artifact();
        assert_eq!(artifact.filename, "Report.csv");
        assert_eq!(artifact.mime_type(), "text/csv");
        assert_eq!(artifact.bytes(), b"A\r\n1\r\n");
    }

    #[test]
    fn test_select_prefers_legacy_save() {
        let recorder = Recorder::default();
        let host = HostCapabilities::standard(Box::new(recorder.clone()))
            .with_blob_saver(Box::new(recorder.clone()));
        let mut sink = select_sink(host);
        assert_eq!(sink.kind(), DeliveryKind::LegacySave);

        let receipt = sink.deliver(&artifact()).unwrap();
        assert_eq!(receipt.kind, DeliveryKind::LegacySave);
        assert_eq!(receipt.bytes, 6);
        assert_eq!(*recorder.0.lock().unwrap(), ["blob:Report.csv"]);
    }

    #[test]
    fn test_select_falls_back_to_standard_download() {
        let recorder = Recorder::default();
        let mut sink = select_sink(HostCapabilities::standard(Box::new(recorder.clone())));
        assert_eq!(sink.kind(), DeliveryKind::StandardDownload);

        sink.deliver(&artifact()).unwrap();
        assert_eq!(*recorder.0.lock().unwrap(), ["anchor:Report.csv"]);
    }

    #[test]
    fn test_delivery_kind_display() {
        assert_eq!(DeliveryKind::LegacySave.to_string(), "legacy_save");
        assert_eq!(DeliveryKind::StandardDownload.as_str(), "standard_download");
    }
}
