//! End-to-end pipeline: listing → retrieval → extraction → result sink
//!
//! Stages run strictly one after another. Each stage can also be invoked on
//! its own, which is how the CLI offers `download` and `extract`. Extraction
//! only reads the PDF directory, so [`extract`] needs no [`HttpSource`].

use crate::case_id::CaseId;
use crate::config::PipelineConfig;
use crate::download_log::{CsvRetrievalLog, RetrievalStatus};
use crate::error::Result;
use crate::heuristic::DecisionDateEngine;
use crate::http::HttpSource;
use crate::listing;
use crate::orchestrator::{ExtractionOutcome, Orchestrator};
use crate::pdf::{PdfTextExtractor, TextExtractor};
use crate::retriever::{RetrievalOutcome, Retriever};
use crate::sink::CsvResultSink;
use crate::state::FileProcessedStore;
use std::collections::BTreeSet;
use tracing::info;

/// Summary of a complete run
#[derive(Debug, Default)]
pub struct RunReport {
    pub cases_found: usize,
    pub retrieval: RetrievalOutcome,
    pub extraction: ExtractionOutcome,
}

impl RunReport {
    pub fn downloaded(&self) -> usize {
        self.retrieval.count(RetrievalStatus::Success)
    }

    pub fn skipped(&self) -> usize {
        self.retrieval.count(RetrievalStatus::SkippedAlreadyExists)
    }

    pub fn retrieval_failures(&self) -> usize {
        self.retrieval.count(RetrievalStatus::InvalidPdf)
            + self.retrieval.count(RetrievalStatus::Failed)
    }

    pub fn dated(&self) -> usize {
        self.extraction.results.iter().filter(|r| r.has_date()).count()
    }
}

/// Extract dates from stored PDFs and append them to the result file
pub fn extract(config: &PipelineConfig) -> Result<ExtractionOutcome> {
    extract_with(
        config,
        &DecisionDateEngine::from_config(config),
        PdfTextExtractor::from_config(config),
    )
}

/// As [`extract`], with a caller-supplied engine and text extractor
pub fn extract_with<X: TextExtractor>(
    config: &PipelineConfig,
    engine: &DecisionDateEngine,
    extractor: X,
) -> Result<ExtractionOutcome> {
    config.ensure_directories()?;
    let store = FileProcessedStore::open(&config.report_path())?;
    let mut orchestrator = Orchestrator::new(store, extractor, engine);
    let outcome = orchestrator.run(&config.paths.pdf_dir)?;

    let sink = CsvResultSink::open(&config.output_csv_path())?;
    sink.append(&outcome.results)?;
    Ok(outcome)
}

/// The harvesting pipeline over one configuration and HTTP source
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    source: &'a dyn HttpSource,
    engine: DecisionDateEngine,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, source: &'a dyn HttpSource) -> Self {
        Self {
            config,
            source,
            engine: DecisionDateEngine::from_config(config),
        }
    }

    /// Case identifiers currently on the listing page
    pub async fn discover(&self) -> BTreeSet<CaseId> {
        listing::fetch_case_ids(self.source, self.config).await
    }

    /// Retrieve `ids` into the PDF directory, logging each attempt.
    /// An empty set makes no attempts and leaves the log untouched.
    pub async fn download(&self, ids: &BTreeSet<CaseId>) -> Result<RetrievalOutcome> {
        if ids.is_empty() {
            return Ok(RetrievalOutcome::default());
        }
        self.config.ensure_directories()?;
        let log = CsvRetrievalLog::open(&self.config.download_log_path())?;
        let mut retriever = Retriever::new(self.config, self.source, log);
        retriever.retrieve_all(ids).await
    }

    /// Run every stage with the PDF text extractor
    pub async fn run(&self) -> Result<RunReport> {
        self.run_with(PdfTextExtractor::from_config(self.config)).await
    }

    /// Run every stage with a caller-supplied text extractor
    pub async fn run_with<X: TextExtractor>(&self, extractor: X) -> Result<RunReport> {
        info!("fetching case identifiers");
        let ids = self.discover().await;
        info!(count = ids.len(), "cases found");

        info!("downloading PDFs");
        let retrieval = self.download(&ids).await?;

        info!("extracting decision dates");
        let extraction = extract_with(self.config, &self.engine, extractor)?;

        let report = RunReport {
            cases_found: ids.len(),
            retrieval,
            extraction,
        };
        info!(
            cases = report.cases_found,
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            retrieval_failures = report.retrieval_failures(),
            processed = report.extraction.results.len(),
            dated = report.dated(),
            extraction_failures = report.extraction.failed.len(),
            "pipeline complete"
        );
        Ok(report)
    }
}
