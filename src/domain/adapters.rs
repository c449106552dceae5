//! Adapter layer for converting the analysis aggregate into reduced views.
//!
//! `ProgressSummary` is what a progress-notification collaborator receives:
//! enough to render a status line without shipping the full result.

use serde::{Deserialize, Serialize};

use crate::domain::models::{AnalysisResult, AnalysisStatus, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub url: String,
    pub status: AnalysisStatus,
    pub overall_score: u8,
    pub confidence: u8,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub total_issues: usize,
}

// ============================================================================
// RESULT TO PROGRESS SUMMARY
// ============================================================================

impl From<&AnalysisResult> for ProgressSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            url: result.url.clone(),
            status: result.status,
            overall_score: result.overall_score,
            confidence: result.confidence,
            critical_issues: result.issue_count(Severity::Critical),
            high_issues: result.issue_count(Severity::High),
            medium_issues: result.issue_count(Severity::Medium),
            low_issues: result.issue_count(Severity::Low),
            total_issues: result.issues.total,
        }
    }
}

impl From<AnalysisResult> for ProgressSummary {
    fn from(result: AnalysisResult) -> Self {
        Self::from(&result)
    }
}
