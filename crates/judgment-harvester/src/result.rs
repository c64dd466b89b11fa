//! Per-document extraction results

use crate::case_id::CaseId;
use serde::{Deserialize, Serialize};

/// Decision date found (or not) for one newly processed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: CaseId,
    /// `None` when no heuristic tier matched
    pub decision_date: Option<String>,
}

impl CaseResult {
    pub fn new(case_id: CaseId, decision_date: Option<String>) -> Self {
        Self {
            case_id,
            decision_date,
        }
    }

    pub fn has_date(&self) -> bool {
        self.decision_date.is_some()
    }
}
