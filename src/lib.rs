// src/lib.rs

pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod lifecycle;
pub mod service;
pub mod test_utils;

pub use config::AnalysisConfig;
pub use domain::models::{AnalysisResult, AnalysisStatus, PageInput, ResponseMeta};
pub use domain::ProgressSummary;
pub use error::{AnalysisError, Result};
pub use service::Orchestrator;
