//! Where rendered documents end up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::BillingResult;

/// Stores a rendered PDF and reports where it went.
#[async_trait]
pub trait InvoiceSink: Send + Sync {
    /// Saves `pdf` under `file_name`; returns a human-readable location.
    async fn save(&self, file_name: &str, pdf: &[u8]) -> BillingResult<String>;
}

/// Writes documents into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileInvoiceSink {
    dir: PathBuf,
}

impl FileInvoiceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileInvoiceSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl InvoiceSink for FileInvoiceSink {
    async fn save(&self, file_name: &str, pdf: &[u8]) -> BillingResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name);
        debug!(path = %path.display(), bytes = pdf.len(), "Writing document");
        tokio::fs::write(&path, pdf).await?;

        info!(path = %path.display(), "Document saved");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_sink_creates_directory() {
        let temp = TempDir::new().unwrap();
        let sink = FileInvoiceSink::new(temp.path().join("nested").join("invoices"));

        let location = sink.save("invoice-ABC.pdf", b"%PDF-1.5").await.unwrap();

        let written = std::fs::read(sink.dir().join("invoice-ABC.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.5");
        assert!(location.ends_with("invoice-ABC.pdf"));
    }

    #[tokio::test]
    async fn test_file_sink_reports_io_errors() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("taken");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let sink = FileInvoiceSink::new(&blocker);
        assert!(sink.save("invoice.pdf", b"x").await.is_err());
    }
}
