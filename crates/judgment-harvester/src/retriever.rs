//! Idempotent document retrieval
//!
//! A document already on disk is never fetched again, so re-running the
//! pipeline is the retry mechanism. Every attempt lands in the
//! [`RetrievalLog`] before the next identifier is considered.

use crate::case_id::CaseId;
use crate::config::PipelineConfig;
use crate::download_log::{RetrievalLog, RetrievalRecord, RetrievalStatus};
use crate::error::Result;
use crate::http::HttpSource;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Magic bytes that open every PDF file
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// How far into the body the signature may appear
const MAGIC_WINDOW: usize = 20;

/// Whether `body` looks like a PDF document
pub fn has_pdf_signature(body: &[u8]) -> bool {
    let window = &body[..body.len().min(MAGIC_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Records and stored paths produced by one retrieval pass
#[derive(Debug, Default)]
pub struct RetrievalOutcome {
    pub records: Vec<RetrievalRecord>,
    /// Documents on disk after the pass, whether fetched now or earlier
    pub stored: Vec<PathBuf>,
}

impl RetrievalOutcome {
    pub fn count(&self, status: RetrievalStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

/// Turns case identifiers into stored PDF files
pub struct Retriever<'a, L: RetrievalLog> {
    config: &'a PipelineConfig,
    source: &'a dyn HttpSource,
    log: L,
}

impl<'a, L: RetrievalLog> Retriever<'a, L> {
    pub fn new(config: &'a PipelineConfig, source: &'a dyn HttpSource, log: L) -> Self {
        Self {
            config,
            source,
            log,
        }
    }

    /// Retrieve every identifier in order, one attempt each.
    ///
    /// Only a failure to write the download log is returned as an error;
    /// network and validation failures become records.
    pub async fn retrieve_all<'i, I>(&mut self, ids: I) -> Result<RetrievalOutcome>
    where
        I: IntoIterator<Item = &'i CaseId>,
    {
        let mut outcome = RetrievalOutcome::default();
        for id in ids {
            let record = self.retrieve(id).await?;
            if record.status.is_stored() {
                outcome
                    .stored
                    .push(id.storage_path(&self.config.paths.pdf_dir));
            }
            outcome.records.push(record);
        }
        Ok(outcome)
    }

    /// Retrieve a single identifier and log the attempt
    pub async fn retrieve(&mut self, id: &CaseId) -> Result<RetrievalRecord> {
        let url = id.pdf_url(&self.config.urls.base_url);
        let path = id.storage_path(&self.config.paths.pdf_dir);

        let record = if path.exists() {
            RetrievalRecord::new(id.clone(), url, RetrievalStatus::SkippedAlreadyExists, "")
        } else {
            self.download(id, url, &path).await
        };

        self.log.record(&record)?;
        Ok(record)
    }

    async fn download(&self, id: &CaseId, url: String, path: &Path) -> RetrievalRecord {
        info!(case_id = %id, url = %url, "downloading");

        let response = match self
            .source
            .get(&url, self.config.network.pdf_timeout())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(case_id = %id, error = %e, "failed to download");
                return RetrievalRecord::new(
                    id.clone(),
                    url,
                    RetrievalStatus::Failed,
                    format!("Exception: {}", e),
                );
            }
        };

        if !response.is_success() || !has_pdf_signature(&response.body) {
            let message = format!("Status {}, not a valid PDF", response.status);
            warn!(case_id = %id, "{}", message);
            return RetrievalRecord::new(id.clone(), url, RetrievalStatus::InvalidPdf, message);
        }

        match write_atomically(path, &response.body).await {
            Ok(()) => RetrievalRecord::new(id.clone(), url, RetrievalStatus::Success, ""),
            Err(e) => {
                warn!(case_id = %id, error = %e, "failed to store document");
                RetrievalRecord::new(
                    id.clone(),
                    url,
                    RetrievalStatus::Failed,
                    format!("Exception: {}", e),
                )
            }
        }
    }

    /// Hand back the log, e.g. to inspect an in-memory one
    pub fn into_log(self) -> L {
        self.log
    }
}

/// Write to a `.part` sibling then rename, so a crash never leaves a
/// truncated `.pdf` that the existence check would treat as complete.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    if let Err(e) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&part, path).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;
    use crate::http::HttpResponse;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Serves one canned outcome for every URL and counts requests
    struct Canned {
        outcome: std::result::Result<HttpResponse, String>,
        calls: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(status: u16, body: &[u8]) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    body: body.to_vec(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl HttpSource for Canned {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse> {
            self.calls.lock().unwrap().push(url.to_string());
            self.outcome
                .clone()
                .map_err(HarvestError::Network)
        }
    }

    fn id(s: &str) -> CaseId {
        CaseId::parse(s).unwrap()
    }

    fn memory_log() -> Vec<RetrievalRecord> {
        Vec::new()
    }

    #[test]
    fn test_signature_window() {
        assert!(has_pdf_signature(b"%PDF-1.7\n..."));
        assert!(has_pdf_signature(b"\xef\xbb\xbf%PDF-1.4"));
        assert!(!has_pdf_signature(b"<!DOCTYPE html><html>"));
        assert!(!has_pdf_signature(b"0123456789012345678%PDF"));
        assert!(!has_pdf_signature(b""));
    }

    #[tokio::test]
    async fn test_success_writes_file() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_root(dir.path());
        config.ensure_directories().unwrap();
        let source = Canned::ok(200, b"%PDF-1.7 body");

        let mut retriever = Retriever::new(&config, &source, memory_log());
        let record = retriever.retrieve(&id("2025_SGHCR_33")).await.unwrap();

        assert_eq!(record.status, RetrievalStatus::Success);
        assert_eq!(record.source_url, "https://www.elitigation.sg/gd/gd/2025_SGHCR_33/pdf");
        let stored = config.paths.pdf_dir.join("2025_SGHCR_33.pdf");
        assert_eq!(std::fs::read(&stored).unwrap(), b"%PDF-1.7 body");
        assert!(!config.paths.pdf_dir.join("2025_SGHCR_33.pdf.part").exists());
        assert_eq!(retriever.into_log(), vec![record]);
    }

    #[tokio::test]
    async fn test_existing_file_is_not_refetched() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_root(dir.path());
        config.ensure_directories().unwrap();
        let source = Canned::ok(200, b"%PDF-1.7");
        let ids = [id("2025_SGHCR_1"), id("2025_SGHCR_2")];

        let mut first = Retriever::new(&config, &source, memory_log());
        let outcome = first.retrieve_all(&ids).await.unwrap();
        assert_eq!(outcome.count(RetrievalStatus::Success), 2);
        assert_eq!(source.calls(), 2);

        let mut second = Retriever::new(&config, &source, memory_log());
        let outcome = second.retrieve_all(&ids).await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(outcome.count(RetrievalStatus::SkippedAlreadyExists), 2);
        assert_eq!(outcome.stored.len(), 2);
        assert!(outcome.records.iter().all(|r| r.message.is_empty()));
    }

    #[tokio::test]
    async fn test_html_body_is_invalid_and_not_kept() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_root(dir.path());
        config.ensure_directories().unwrap();
        let source = Canned::ok(200, b"<html>login required</html>");

        let mut retriever = Retriever::new(&config, &source, memory_log());
        let outcome = retriever.retrieve_all(&[id("2025_SGHCR_5")]).await.unwrap();

        let record = &outcome.records[0];
        assert_eq!(record.status, RetrievalStatus::InvalidPdf);
        assert_eq!(record.message, "Status 200, not a valid PDF");
        assert!(outcome.stored.is_empty());
        assert!(!config.paths.pdf_dir.join("2025_SGHCR_5.pdf").exists());
    }

    #[tokio::test]
    async fn test_error_status_is_invalid() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_root(dir.path());
        config.ensure_directories().unwrap();
        let source = Canned::ok(404, b"%PDF-looking error page");

        let mut retriever = Retriever::new(&config, &source, memory_log());
        let record = retriever.retrieve(&id("2025_SGHCR_6")).await.unwrap();
        assert_eq!(record.status, RetrievalStatus::InvalidPdf);
        assert_eq!(record.message, "Status 404, not a valid PDF");
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_root(dir.path());
        config.ensure_directories().unwrap();
        let source = Canned::err("connection reset");

        let mut retriever = Retriever::new(&config, &source, memory_log());
        let record = retriever.retrieve(&id("2025_SGHCR_7")).await.unwrap();
        assert_eq!(record.status, RetrievalStatus::Failed);
        assert_eq!(record.message, "Exception: Network error: connection reset");
    }

    #[tokio::test]
    async fn test_missing_storage_dir_is_failed_not_fatal() {
        let dir = tempdir().unwrap();
        // Directories deliberately not created.
        let config = PipelineConfig::default().with_root(dir.path());
        let source = Canned::ok(200, b"%PDF-1.7");

        let mut retriever = Retriever::new(&config, &source, memory_log());
        let record = retriever.retrieve(&id("2025_SGHCR_8")).await.unwrap();
        assert_eq!(record.status, RetrievalStatus::Failed);
        assert!(record.message.starts_with("Exception: "));
    }
}
