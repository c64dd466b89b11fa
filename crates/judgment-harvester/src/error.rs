//! Error types for the harvesting pipeline

use thiserror::Error;

/// Result type for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Errors that can occur while harvesting judgments
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Transport failure while fetching a listing or document
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP response
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Fetched bytes are not a recognised document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// PDF could not be opened or parsed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Configuration could not be loaded or is out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for HarvestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HarvestError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            HarvestError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            HarvestError::InvalidUrl(err.to_string())
        } else {
            HarvestError::Network(err.to_string())
        }
    }
}

impl From<lopdf::Error> for HarvestError {
    fn from(err: lopdf::Error) -> Self {
        HarvestError::Pdf(err.to_string())
    }
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::Config(err.to_string())
    }
}
