//! Pipeline configuration
//!
//! Loaded once at startup and passed by reference into every component.
//! Nothing in the crate reads configuration from global state.

use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete pipeline configuration, mirroring the on-disk TOML layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub urls: UrlConfig,
    pub paths: PathConfig,
    pub extraction: ExtractionConfig,
    pub network: NetworkConfig,
}

/// Remote endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Site root used to build document URLs
    pub base_url: String,
    /// Page listing recently published judgments
    pub listing_url: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.elitigation.sg".to_string(),
            listing_url: "https://www.elitigation.sg/gd".to_string(),
        }
    }
}

/// Local storage layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub pdf_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Processed-set report file name, relative to `log_dir`
    pub report_file: String,
    /// Result CSV file name, relative to `output_dir`
    pub output_csv: String,
    /// Download log file name, relative to `log_dir`
    pub download_log: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("data/pdfs"),
            output_dir: PathBuf::from("data/output"),
            log_dir: PathBuf::from("data/logs"),
            report_file: "processed.txt".to_string(),
            output_csv: "decision_dates.csv".to_string(),
            download_log: "download_log.csv".to_string(),
        }
    }
}

/// Limits applied while turning documents into dates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Leading pages read from each PDF
    pub max_pdf_pages: usize,
    /// Upper bound on the header region scanned by the last heuristic tier
    pub header_max_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pdf_pages: 3,
            header_max_lines: 80,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub listing_timeout_secs: u64,
    pub pdf_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listing_timeout_secs: 30,
            pdf_timeout_secs: 60,
            user_agent: format!("JudgmentHarvester/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetworkConfig {
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject limits that would make the pipeline a no-op
    pub fn validate(&self) -> Result<()> {
        if self.extraction.max_pdf_pages == 0 {
            return Err(HarvestError::Config(
                "extraction.max_pdf_pages must be at least 1".to_string(),
            ));
        }
        if self.network.listing_timeout_secs == 0 || self.network.pdf_timeout_secs == 0 {
            return Err(HarvestError::Config(
                "network timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.urls.base_url.trim().is_empty() {
            return Err(HarvestError::Config("urls.base_url is empty".to_string()));
        }
        Ok(())
    }

    /// Ensure the storage, output and log directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.paths.pdf_dir, &self.paths.output_dir, &self.paths.log_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.paths.log_dir.join(&self.paths.report_file)
    }

    pub fn download_log_path(&self) -> PathBuf {
        self.paths.log_dir.join(&self.paths.download_log)
    }

    pub fn output_csv_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.paths.output_csv)
    }

    /// Put all storage under a single root directory
    pub fn with_root(mut self, root: &Path) -> Self {
        self.paths.pdf_dir = root.join("pdfs");
        self.paths.output_dir = root.join("output");
        self.paths.log_dir = root.join("logs");
        self
    }

    /// Set the site root used for document URLs
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.urls.base_url = base_url.into();
        self
    }

    /// Set the listing page URL
    pub fn with_listing_url(mut self, listing_url: impl Into<String>) -> Self {
        self.urls.listing_url = listing_url.into();
        self
    }

    /// Set the page limit for text extraction
    pub fn with_max_pdf_pages(mut self, pages: usize) -> Self {
        self.extraction.max_pdf_pages = pages;
        self
    }

    /// Set the header-region line limit
    pub fn with_header_max_lines(mut self, lines: usize) -> Self {
        self.extraction.header_max_lines = lines;
        self
    }
}
