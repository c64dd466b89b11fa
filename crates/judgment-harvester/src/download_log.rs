//! Append-only record of every retrieval attempt

use crate::case_id::CaseId;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Column names of the download log
pub const DOWNLOAD_LOG_HEADER: [&str; 4] = ["case_id", "pdf_url", "status", "message"];

/// Outcome of a single retrieval attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetrievalStatus {
    /// File was already on disk; no request made
    SkippedAlreadyExists,
    Success,
    /// Response was not a PDF or carried a failure status
    InvalidPdf,
    /// Transport or local write failure
    Failed,
}

impl RetrievalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStatus::SkippedAlreadyExists => "SKIPPED_ALREADY_EXISTS",
            RetrievalStatus::Success => "SUCCESS",
            RetrievalStatus::InvalidPdf => "INVALID_PDF",
            RetrievalStatus::Failed => "FAILED",
        }
    }

    /// Whether the document is on disk after this attempt
    pub fn is_stored(&self) -> bool {
        matches!(
            self,
            RetrievalStatus::SkippedAlreadyExists | RetrievalStatus::Success
        )
    }
}

impl fmt::Display for RetrievalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the download log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalRecord {
    pub case_id: CaseId,
    #[serde(rename = "pdf_url")]
    pub source_url: String,
    pub status: RetrievalStatus,
    pub message: String,
}

impl RetrievalRecord {
    pub fn new(
        case_id: CaseId,
        source_url: impl Into<String>,
        status: RetrievalStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            case_id,
            source_url: source_url.into(),
            status,
            message: message.into(),
        }
    }
}

/// Sink for retrieval records. Implementations must persist each record
/// before returning.
pub trait RetrievalLog {
    fn record(&mut self, record: &RetrievalRecord) -> Result<()>;
}

/// In-memory log, used where durability does not matter
impl RetrievalLog for Vec<RetrievalRecord> {
    fn record(&mut self, record: &RetrievalRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// CSV-backed download log, flushed after every row
pub struct CsvRetrievalLog {
    writer: csv::Writer<File>,
}

impl CsvRetrievalLog {
    /// Open (or create) the log, writing the header only for a new file
    pub fn open(path: &Path) -> Result<Self> {
        let write_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(DOWNLOAD_LOG_HEADER)?;
            writer.flush()?;
        }

        Ok(Self { writer })
    }
}

impl RetrievalLog for CsvRetrievalLog {
    fn record(&mut self, record: &RetrievalRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Read a download log back into records
pub fn read_download_log(path: &Path) -> Result<Vec<RetrievalRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
