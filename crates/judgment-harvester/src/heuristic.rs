//! Decision-date heuristics
//!
//! Judgments do not mark their decision date consistently, so the engine runs
//! an ordered cascade of independent [`DateMatcher`] tiers over the extracted
//! text and returns the first hit:
//!
//! 1. [`ExplicitLabel`]: a "Decision Date" label, on its line or the next.
//! 2. [`DateKeyword`]: the first line with the word `Date` and a date on it.
//! 3. [`HeaderRegion`]: the last single-date line of the document header.
//!
//! No match is not an error; the engine returns `None`.

use crate::config::PipelineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// `<day> <month word> <year>`, e.g. `3 March 2024` or `9 Sep 2022`
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4})\b").expect("date pattern")
});

/// Standalone, case-sensitive `Date`
static DATE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bDate\b").expect("date word"));

/// Numbered paragraph, e.g. `1 The claimant...`
static SECTION_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\s").expect("section start"));

/// Line terminators, including lone `\r` and form feeds between pages
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c\x1d\x1e\x{85}\x{2028}\x{2029}]").expect("line break")
});

const DECISION_LABEL: &str = "decision date";

const BODY_MARKER: &str = "Introduction";

/// All date tokens on `line`, in order
pub fn date_tokens(line: &str) -> Vec<String> {
    DATE_PATTERN
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Split `text` into lines on any line terminator, without a trailing
/// empty line
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK.split(text).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn first_date(line: &str) -> Option<String> {
    DATE_PATTERN
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn is_label_line(line: &str) -> bool {
    line.to_lowercase().contains(DECISION_LABEL)
}

/// Index of the first body line (`Introduction` or a numbered paragraph),
/// or `lines.len()` if the body never starts
pub fn header_boundary(lines: &[&str]) -> usize {
    lines
        .iter()
        .position(|line| {
            let trimmed = line.trim();
            trimmed.starts_with(BODY_MARKER) || SECTION_START.is_match(trimmed)
        })
        .unwrap_or(lines.len())
}

/// Which tier produced a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    ExplicitLabel,
    DateKeyword,
    HeaderRegion,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::ExplicitLabel => write!(f, "explicit_label"),
            Tier::DateKeyword => write!(f, "date_keyword"),
            Tier::HeaderRegion => write!(f, "header_region"),
        }
    }
}

/// A date found by one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateMatch {
    pub tier: Tier,
    pub date: String,
}

/// One tier of the cascade
pub trait DateMatcher: Send + Sync {
    fn tier(&self) -> Tier;

    /// Search the document lines, returning a date token if this tier applies
    fn find(&self, lines: &[&str]) -> Option<String>;
}

/// Lines labelled "decision date" (any case); the date may sit on the
/// following line when the label stands alone
pub struct ExplicitLabel;

impl DateMatcher for ExplicitLabel {
    fn tier(&self) -> Tier {
        Tier::ExplicitLabel
    }

    fn find(&self, lines: &[&str]) -> Option<String> {
        for (i, line) in lines.iter().enumerate() {
            if !is_label_line(line) {
                continue;
            }
            if let Some(date) = first_date(line) {
                return Some(date);
            }
            if let Some(date) = lines.get(i + 1).and_then(|next| first_date(next)) {
                return Some(date);
            }
        }
        None
    }
}

/// First non-label line containing the word `Date` and a date token
pub struct DateKeyword;

impl DateMatcher for DateKeyword {
    fn tier(&self) -> Tier {
        Tier::DateKeyword
    }

    fn find(&self, lines: &[&str]) -> Option<String> {
        lines
            .iter()
            .filter(|line| !is_label_line(line))
            .filter(|line| DATE_WORD.is_match(line))
            .find_map(|line| first_date(line))
    }
}

/// Layout fallback over the header region.
///
/// Single-date lines win over multi-date lines, and the latest qualifying
/// line wins over earlier ones: hearing and filing dates tend to precede the
/// decision date.
pub struct HeaderRegion {
    max_lines: usize,
}

impl HeaderRegion {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }
}

impl DateMatcher for HeaderRegion {
    fn tier(&self) -> Tier {
        Tier::HeaderRegion
    }

    fn find(&self, lines: &[&str]) -> Option<String> {
        let end = header_boundary(lines).min(self.max_lines).min(lines.len());

        let dated: Vec<Vec<String>> = lines[..end]
            .iter()
            .map(|line| date_tokens(line))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let chosen = dated
            .iter()
            .rev()
            .find(|tokens| tokens.len() == 1)
            .or_else(|| dated.last())?;

        chosen.last().cloned()
    }
}

/// Ordered cascade of date matchers
pub struct DecisionDateEngine {
    matchers: Vec<Box<dyn DateMatcher>>,
}

impl DecisionDateEngine {
    /// Standard three-tier cascade
    pub fn new(header_max_lines: usize) -> Self {
        Self::with_matchers(vec![
            Box::new(ExplicitLabel),
            Box::new(DateKeyword),
            Box::new(HeaderRegion::new(header_max_lines)),
        ])
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.extraction.header_max_lines)
    }

    /// Custom cascade, applied in the given order
    pub fn with_matchers(matchers: Vec<Box<dyn DateMatcher>>) -> Self {
        Self { matchers }
    }

    /// Run the tiers in order and report the first hit
    pub fn find_match(&self, text: &str) -> Option<DateMatch> {
        let lines = split_lines(text);
        self.matchers.iter().find_map(|matcher| {
            matcher.find(&lines).map(|date| DateMatch {
                tier: matcher.tier(),
                date,
            })
        })
    }

    /// Decision date for `text`, if any tier finds one
    pub fn extract(&self, text: &str) -> Option<String> {
        self.find_match(text).map(|m| m.date)
    }
}
