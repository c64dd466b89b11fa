//! Durable record of which documents have had date extraction attempted

use crate::case_id::CaseId;
use crate::error::Result;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Set of processed case identifiers that only ever grows
pub trait ProcessedStore {
    fn contains(&self, id: &CaseId) -> bool;

    /// Add `id` durably. Marking an id twice is a no-op.
    fn mark(&mut self, id: &CaseId) -> Result<()>;

    fn iter(&self) -> Box<dyn Iterator<Item = &CaseId> + '_>;

    fn len(&self) -> usize {
        self.iter().count()
    }
}

/// Non-durable store for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryProcessedStore {
    ids: BTreeSet<CaseId>,
}

impl MemoryProcessedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<CaseId> for MemoryProcessedStore {
    fn from_iter<T: IntoIterator<Item = CaseId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl ProcessedStore for MemoryProcessedStore {
    fn contains(&self, id: &CaseId) -> bool {
        self.ids.contains(id)
    }

    fn mark(&mut self, id: &CaseId) -> Result<()> {
        self.ids.insert(id.clone());
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &CaseId> + '_> {
        Box::new(self.ids.iter())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Report file with one identifier per line, appended and flushed per mark
pub struct FileProcessedStore {
    ids: BTreeSet<CaseId>,
    writer: BufWriter<File>,
}

impl FileProcessedStore {
    /// Load the existing report (if any) and open it for appending
    pub fn open(path: &Path) -> Result<Self> {
        let mut ids = BTreeSet::new();
        if path.exists() {
            for line in fs::read_to_string(path)?.lines() {
                let token = line.trim();
                if token.is_empty() {
                    continue;
                }
                match CaseId::parse(token) {
                    Some(id) => {
                        ids.insert(id);
                    }
                    None => warn!(path = %path.display(), line = token, "ignoring malformed entry"),
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            ids,
            writer: BufWriter::new(file),
        })
    }
}

impl ProcessedStore for FileProcessedStore {
    fn contains(&self, id: &CaseId) -> bool {
        self.ids.contains(id)
    }

    fn mark(&mut self, id: &CaseId) -> Result<()> {
        if self.ids.contains(id) {
            return Ok(());
        }
        writeln!(self.writer, "{}", id)?;
        self.writer.flush()?;
        self.ids.insert(id.clone());
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &CaseId> + '_> {
        Box::new(self.ids.iter())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
