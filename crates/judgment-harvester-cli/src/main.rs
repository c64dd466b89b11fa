//! Judgment harvester CLI
//!
//! - `run`: listing → download → extract → results CSV
//! - `download`: listing → download only
//! - `extract`: extract dates from already-stored PDFs
//! - `date <file>`: run the date heuristic on a single text or PDF file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use judgment_harvester::{
    pipeline, DecisionDateEngine, PdfTextExtractor, Pipeline, PipelineConfig, ReqwestSource,
    TextExtractor,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "judgment-harvester")]
#[command(about = "Harvest court judgments and extract their decision dates")]
struct Args {
    /// Path to the TOML configuration file (defaults apply if missing)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log filter, e.g. `info` or `judgment_harvester=debug`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline
    Run,
    /// Discover case ids and download their PDFs
    Download,
    /// Extract decision dates from stored PDFs
    Extract,
    /// Print the decision date found in a single file
    Date {
        /// Plain-text file, or a `.pdf` to run through the extractor
        file: PathBuf,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let config = PipelineConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.validate()?;

    match args.command {
        Command::Run => {
            let source = ReqwestSource::new(&config)?;
            let report = Pipeline::new(&config, &source).run().await?;
            println!(
                "{} cases, {} downloaded, {} skipped, {} retrieval failures, {} new results ({} dated), {} extraction failures",
                report.cases_found,
                report.downloaded(),
                report.skipped(),
                report.retrieval_failures(),
                report.extraction.results.len(),
                report.dated(),
                report.extraction.failed.len(),
            );
            println!("Results: {}", config.output_csv_path().display());
        }
        Command::Download => {
            let source = ReqwestSource::new(&config)?;
            let pipeline = Pipeline::new(&config, &source);
            let ids = pipeline.discover().await;
            let outcome = pipeline.download(&ids).await?;
            for record in &outcome.records {
                println!("{}\t{}\t{}", record.case_id, record.status, record.message);
            }
            info!(log = %config.download_log_path().display(), "download log updated");
        }
        Command::Extract => {
            let outcome = pipeline::extract(&config)?;
            for result in &outcome.results {
                println!(
                    "{}\t{}",
                    result.case_id,
                    result.decision_date.as_deref().unwrap_or("-")
                );
            }
            if !outcome.failed.is_empty() {
                println!("{} documents failed and will be retried", outcome.failed.len());
            }
        }
        Command::Date { file } => {
            let text = if file.extension().and_then(|e| e.to_str()) == Some("pdf") {
                PdfTextExtractor::from_config(&config).extract_text(&file)?
            } else {
                std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?
            };

            match DecisionDateEngine::from_config(&config).find_match(&text) {
                Some(found) => println!("{}\t{}", found.date, found.tier),
                None => println!("no decision date found"),
            }
        }
    }

    Ok(())
}
