//! Append-only CSV output for case results

use crate::error::Result;
use crate::result::CaseResult;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Column names of the result file
pub const RESULT_HEADER: [&str; 2] = ["case_id", "decision_date"];

/// Result file that is created with a header once and only ever appended to
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    /// Open the sink, writing the header if the file does not exist yet
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(RESULT_HEADER)?;
            writer.flush()?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Append `rows`; an empty slice leaves the file untouched
    pub fn append(&self, rows: &[CaseResult]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read every row currently in the file
    pub fn read_all(&self) -> Result<Vec<CaseResult>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case_id::CaseId;
    use std::fs;
    use tempfile::tempdir;

    fn row(id: &str, date: Option<&str>) -> CaseResult {
        CaseResult::new(CaseId::parse(id).unwrap(), date.map(str::to_string))
    }

    #[test]
    fn test_header_once_and_rows_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decision_dates.csv");

        let sink = CsvResultSink::open(&path).unwrap();
        sink.append(&[row("2025_SGHCR_1", Some("3 March 2024"))]).unwrap();

        let sink = CsvResultSink::open(&path).unwrap();
        sink.append(&[row("2025_SGHCR_2", None)]).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "case_id,decision_date\n2025_SGHCR_1,3 March 2024\n2025_SGHCR_2,\n"
        );
    }

    #[test]
    fn test_empty_append_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decision_dates.csv");
        let sink = CsvResultSink::open(&path).unwrap();
        sink.append(&[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "case_id,decision_date\n");
        assert!(sink.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_back_preserves_missing_dates() {
        let dir = tempdir().unwrap();
        let sink = CsvResultSink::open(&dir.path().join("out.csv")).unwrap();
        let rows = vec![row("2025_SGHCR_1", None), row("2025_SGHCR_2", Some("9 Sep 2022"))];
        sink.append(&rows).unwrap();

        assert_eq!(sink.read_all().unwrap(), rows);
    }
}
