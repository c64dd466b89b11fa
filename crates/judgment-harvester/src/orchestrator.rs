//! Resumable extraction over the stored documents
//!
//! The [`ProcessedStore`] is the only thing deciding whether a document is
//! looked at again: an id is marked as soon as its extraction succeeds, and a
//! failed extraction leaves it unmarked so the next run retries it.

use crate::case_id::CaseId;
use crate::error::Result;
use crate::heuristic::DecisionDateEngine;
use crate::pdf::TextExtractor;
use crate::result::CaseResult;
use crate::state::ProcessedStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Results of one extraction pass
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// One per document processed in this pass, in filename order
    pub results: Vec<CaseResult>,
    /// Documents whose extraction failed; left unmarked for the next run
    pub failed: Vec<CaseId>,
    /// Documents skipped because an earlier run already processed them
    pub already_processed: usize,
}

/// Stored documents in `pdf_dir`, sorted by file name
pub fn stored_documents(pdf_dir: &Path) -> Result<Vec<(CaseId, PathBuf)>> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(pdf_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match CaseId::from_storage_path(&path) {
            Some(id) => docs.push((id, path)),
            None => debug!(path = %path.display(), "not a stored judgment, ignoring"),
        }
    }
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(docs)
}

/// Drives text extraction and the date heuristic over stored documents
pub struct Orchestrator<'a, S: ProcessedStore, X: TextExtractor> {
    store: S,
    extractor: X,
    engine: &'a DecisionDateEngine,
}

impl<'a, S: ProcessedStore, X: TextExtractor> Orchestrator<'a, S, X> {
    pub fn new(store: S, extractor: X, engine: &'a DecisionDateEngine) -> Self {
        Self {
            store,
            extractor,
            engine,
        }
    }

    /// Process every stored document not yet in the store.
    ///
    /// Per-document failures are logged and collected; only failing to list
    /// `pdf_dir` or to persist a mark aborts the pass.
    pub fn run(&mut self, pdf_dir: &Path) -> Result<ExtractionOutcome> {
        let mut outcome = ExtractionOutcome::default();

        for (id, path) in stored_documents(pdf_dir)? {
            if self.store.contains(&id) {
                outcome.already_processed += 1;
                continue;
            }

            match self.extractor.extract_text(&path) {
                Ok(text) => {
                    let found = self.engine.find_match(&text);
                    self.store.mark(&id)?;

                    match &found {
                        Some(m) => info!(case_id = %id, date = %m.date, tier = %m.tier, "decision date found"),
                        None => info!(case_id = %id, "no decision date found"),
                    }
                    outcome
                        .results
                        .push(CaseResult::new(id, found.map(|m| m.date)));
                }
                Err(e) => {
                    error!(case_id = %id, error = %e, "extraction failed");
                    outcome.failed.push(id);
                }
            }
        }

        Ok(outcome)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand back the store, e.g. to inspect an in-memory one
    pub fn into_store(self) -> S {
        self.store
    }
}
