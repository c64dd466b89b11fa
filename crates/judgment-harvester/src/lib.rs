//! # Judgment Harvester
//!
//! Resumable retrieval of published court judgments and best-effort
//! extraction of each judgment's decision date.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Listing page │ ──► │  Retriever  │ ──► │ Orchestrator │ ──► │ Result CSV  │
//! │ (case ids)   │     │ (PDF store) │     │ (text+dates) │     │ (append)    │
//! └──────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//!                             │                   │
//!                             ▼                   ▼
//!                      download log         processed set
//! ```
//!
//! Every stage is safe to re-run: documents on disk are not fetched again,
//! and documents in the processed set are not re-extracted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use judgment_harvester::{Pipeline, PipelineConfig, ReqwestSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let source = ReqwestSource::new(&config)?;
//!     let report = Pipeline::new(&config, &source).run().await?;
//!     println!("{} new results", report.extraction.results.len());
//!     Ok(())
//! }
//! ```

pub mod case_id;
pub mod config;
pub mod download_log;
pub mod error;
pub mod heuristic;
pub mod http;
pub mod listing;
pub mod orchestrator;
pub mod pdf;
pub mod pipeline;
pub mod result;
pub mod retriever;
pub mod sink;
pub mod state;

pub use case_id::CaseId;
pub use config::PipelineConfig;
pub use download_log::{CsvRetrievalLog, RetrievalLog, RetrievalRecord, RetrievalStatus};
pub use error::{HarvestError, Result};
pub use heuristic::{DateMatch, DateMatcher, DecisionDateEngine, Tier};
pub use http::{HttpResponse, HttpSource, ReqwestSource};
pub use orchestrator::{ExtractionOutcome, Orchestrator};
pub use pdf::{PdfTextExtractor, TextExtractor};
pub use pipeline::{Pipeline, RunReport};
pub use result::CaseResult;
pub use retriever::{RetrievalOutcome, Retriever};
pub use sink::CsvResultSink;
pub use state::{FileProcessedStore, MemoryProcessedStore, ProcessedStore};
