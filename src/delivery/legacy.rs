//! Legacy save-blob delivery.

use super::{Artifact, DeliveryKind, DeliveryReceipt, DeliverySink};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Host capability that saves raw bytes under a filename.
pub trait BlobSaver {
    /// Saves `bytes` as `filename`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot save the data.
    fn save_blob(&mut self, bytes: &[u8], filename: &str) -> Result<()>;
}

impl<T: BlobSaver + ?Sized> BlobSaver for Box<T> {
    fn save_blob(&mut self, bytes: &[u8], filename: &str) -> Result<()> {
        (**self).save_blob(bytes, filename)
    }
}

impl<T: BlobSaver + ?Sized> BlobSaver for &mut T {
    fn save_blob(&mut self, bytes: &[u8], filename: &str) -> Result<()> {
        (**self).save_blob(bytes, filename)
    }
}

/// Delivery through a [`BlobSaver`].
pub struct LegacySave<S: BlobSaver> {
    saver: S,
}

impl<S: BlobSaver> LegacySave<S> {
    /// Wraps a blob saver.
    #[must_use]
    pub const fn new(saver: S) -> Self {
        Self { saver }
    }
}

impl<S: BlobSaver> DeliverySink for LegacySave<S> {
    fn deliver(&mut self, artifact: &Artifact) -> Result<DeliveryReceipt> {
        self.saver.save_blob(artifact.bytes(), &artifact.filename)?;
        Ok(DeliveryReceipt::new(DeliveryKind::LegacySave, artifact))
    }

    fn kind(&self) -> DeliveryKind {
        DeliveryKind::LegacySave
    }
}

/// Saves blobs as files inside a directory.
///
/// Existing files with the same name are overwritten.
#[derive(Debug, Clone)]
pub struct DirectoryBlobSaver {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectoryBlobSaver {
    /// Creates a saver writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_saved: None,
        }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently saved file.
    #[must_use]
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

impl BlobSaver for DirectoryBlobSaver {
    fn save_blob(&mut self, bytes: &[u8], filename: &str) -> Result<()> {
        // The receipt reports `filename` verbatim, so it must name the file
        // actually written: a single component, nothing to strip.
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.len() == filename.len())
            .ok_or_else(|| Error::InvalidInput(format!("invalid filename: {filename}")))?;

        fs::create_dir_all(&self.dir).map_err(|e| Error::OperationFailed {
            operation: "create_output_dir".to_string(),
            cause: format!("{}: {e}", self.dir.display()),
        })?;

        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(|e| Error::OperationFailed {
            operation: "save_blob".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "saved export file");
        self.last_saved = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formats::Format;
    use tempfile::TempDir;

    fn artifact(filename: &str) -> Artifact {
        Artifact {
            filename: filename.to_string(),
            format: Format::Csv,
            body: "A\r\nx\r\n".to_string(),
        }
    }

    #[test]
    fn test_directory_saver_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut sink = LegacySave::new(DirectoryBlobSaver::new(dir.path().join("out")));

        let receipt = sink.deliver(&artifact("export.csv")).unwrap();

        assert_eq!(receipt.filename, "export.csv");
        let written = fs::read_to_string(dir.path().join("out").join("export.csv")).unwrap();
        assert_eq!(written, "A\r\nx\r\n");
    }

    #[test]
    fn test_directory_saver_rejects_path_components() {
        let dir = TempDir::new().unwrap();
        let mut saver = DirectoryBlobSaver::new(dir.path().join("out"));
        assert!(saver.save_blob(b"x", "../../escape.csv").is_err());
        assert!(saver.save_blob(b"x", "Q1/2024 Export.csv").is_err());
        assert!(saver.last_saved().is_none());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_receipt_names_saved_file() {
        let dir = TempDir::new().unwrap();
        let doc = crate::models::Document::new(Format::Csv, "A\r\n1\r\n".to_string(), 1);
        let artifact = Artifact::from_document(doc, Some("Q1/2024 Export"));
        let mut saver = DirectoryBlobSaver::new(dir.path());

        let receipt = LegacySave::new(&mut saver).deliver(&artifact).unwrap();

        assert_eq!(receipt.filename, "Q1_2024 Export.csv");
        assert_eq!(
            saver.last_saved(),
            Some(dir.path().join(&receipt.filename).as_path())
        );
        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, [std::ffi::OsString::from("Q1_2024 Export.csv")]);
    }

    #[test]
    fn test_directory_saver_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut saver = DirectoryBlobSaver::new(dir.path());
        assert!(saver.save_blob(b"x", "..").is_err());
    }
}
