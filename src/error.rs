//! Error types for the page analysis pipeline.
//!
//! This module provides structured error handling with:
//! - `AnalysisError`: Domain-specific errors raised inside the pipeline
//! - `Result<T>`: Type alias for Results using AnalysisError
//!
//! None of these errors escape `Orchestrator::analyze`; they are folded into
//! the `error` field of the returned `AnalysisResult`.

use thiserror::Error;

use crate::domain::models::Phase;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for pipeline operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid or malformed page URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Input document could not be interpreted
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A single extraction module failed
    #[error("Extraction module '{module}' failed: {message}")]
    Extraction { module: &'static str, message: String },

    /// A pipeline phase failed
    #[error("Phase {phase} failed: {message}")]
    Phase { phase: Phase, message: String },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// External collaborator error (metrics, resource checks)
    #[error("Collaborator error ({service}): {message}")]
    Collaborator { service: &'static str, message: String },

    /// Run exceeded its deadline
    #[error("Analysis timed out after {0}ms")]
    Timeout(u64),

    /// Run was cancelled by the caller
    #[error("Analysis cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Create an extraction error
    pub fn extraction(module: &'static str, msg: impl Into<String>) -> Self {
        Self::Extraction { module, message: msg.into() }
    }

    /// Create a phase error
    pub fn phase(phase: Phase, msg: impl Into<String>) -> Self {
        Self::Phase { phase, message: msg.into() }
    }

    /// Create a collaborator error
    pub fn collaborator(service: &'static str, msg: impl Into<String>) -> Self {
        Self::Collaborator { service, message: msg.into() }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias using AnalysisError.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_error_names_the_phase() {
        let err = AnalysisError::phase(Phase::Scoring, "weights sum to zero");
        assert_eq!(err.to_string(), "Phase scoring failed: weights sum to zero");
    }

    #[test]
    fn test_anyhow_errors_convert() {
        let err: AnalysisError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AnalysisError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
