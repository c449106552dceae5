pub mod collaborators;
pub mod insights;
pub mod issues;
pub mod orchestrator;
pub mod recommendations;
pub mod scoring;
pub mod timing;

pub use collaborators::{
    KnownResources, MetricsProvider, NoMetrics, SiteResourceChecker, SiteResources, StaticMetrics,
    UncheckedResources,
};
pub use insights::ContentInsightsAnalyzer;
pub use issues::IssueDetector;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use recommendations::RecommendationEngine;
pub use scoring::ScoringEngine;
