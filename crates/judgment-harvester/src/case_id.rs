//! Case identifiers (`YEAR_COURTCODE_NUMBER`, e.g. `2025_SGHCR_33`)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

static CASE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}_[A-Z]+_\d+$").expect("case id pattern"));

/// A validated case identifier.
///
/// Only constructible through [`CaseId::parse`], so every value in the
/// pipeline is known to match the token pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId(String);

impl CaseId {
    /// Parse a token, returning `None` if it is not a case identifier
    pub fn parse(token: &str) -> Option<Self> {
        if CASE_ID_PATTERN.is_match(token) {
            Some(Self(token.to_string()))
        } else {
            None
        }
    }

    /// `{base}/gd/gd/{case_id}/pdf`
    pub fn pdf_url(&self, base_url: &str) -> String {
        format!("{}/gd/gd/{}/pdf", base_url.trim_end_matches('/'), self.0)
    }

    /// `{pdf_dir}/{case_id}.pdf`
    pub fn storage_path(&self, pdf_dir: &Path) -> PathBuf {
        pdf_dir.join(format!("{}.pdf", self.0))
    }

    /// Recover the identifier from a stored document path
    pub fn from_storage_path(path: &Path) -> Option<Self> {
        if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
            return None;
        }
        path.file_stem().and_then(|s| s.to_str()).and_then(Self::parse)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CaseId {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a case identifier: {}", value))
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.0
    }
}
