//! Pipeline orchestrator for a single page.
//!
//! Phase order is fixed:
//! Extraction (modules ‖ metrics ‖ resources) → Scoring → Content Insights →
//! Issue Detection → Recommendations → Aggregation.
//!
//! `analyze` never returns an error. Every failure mode ends in a fully typed
//! `AnalysisResult`: `Failed` for input rejected up front, the zeroed
//! `CompletedWithFallback` result for phase errors, panics, the run deadline
//! and cancellation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{AnalysisConfig, ConfidenceConfig};
use crate::domain::models::{
    AnalysisResult, AnalysisStatus, PageFacts, PageInput, Phase, PerformanceMetrics,
};
use crate::error::{AnalysisError, Result};
use crate::extractor::content::parse_date;
use crate::extractor::{panic_message, ContentExtractor, ExtractionOutput, ExtractionSuite};
use crate::service::collaborators::{
    MetricsProvider, NoMetrics, SiteResourceChecker, SiteResources, UncheckedResources,
};
use crate::service::insights::ContentInsightsAnalyzer;
use crate::service::issues::IssueDetector;
use crate::service::recommendations::RecommendationEngine;
use crate::service::scoring::ScoringEngine;
use crate::service::timing::PhaseTimer;

pub struct Orchestrator {
    config: Arc<AnalysisConfig>,
    extraction: Arc<ExtractionSuite>,
    metrics: Arc<dyn MetricsProvider>,
    resources: Arc<dyn SiteResourceChecker>,
    scoring: ScoringEngine,
    insights: ContentInsightsAnalyzer,
    issues: IssueDetector,
    recommendations: RecommendationEngine,
}

#[derive(Default)]
pub struct OrchestratorBuilder {
    config: Option<AnalysisConfig>,
    extraction: Option<ExtractionSuite>,
    metrics: Option<Arc<dyn MetricsProvider>>,
    resources: Option<Arc<dyn SiteResourceChecker>>,
}

impl OrchestratorBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn extraction(mut self, suite: ExtractionSuite) -> Self {
        self.extraction = Some(suite);
        self
    }

    pub fn metrics(mut self, provider: Arc<dyn MetricsProvider>) -> Self {
        self.metrics = Some(provider);
        self
    }

    pub fn resources(mut self, checker: Arc<dyn SiteResourceChecker>) -> Self {
        self.resources = Some(checker);
        self
    }

    /// Validates the config and wires every phase service to it.
    pub fn build(self) -> Result<Orchestrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let config = Arc::new(config);

        let extraction = self.extraction.unwrap_or_else(|| ExtractionSuite {
            content: Arc::new(ContentExtractor::from_thresholds(&config.thresholds)),
            ..Default::default()
        });

        tracing::debug!("[PIPELINE] orchestrator built with config {}", config.version);

        Ok(Orchestrator {
            extraction: Arc::new(extraction),
            metrics: self.metrics.unwrap_or_else(|| Arc::new(NoMetrics)),
            resources: self.resources.unwrap_or_else(|| Arc::new(UncheckedResources)),
            scoring: ScoringEngine::new(config.clone()),
            insights: ContentInsightsAnalyzer::new(config.clone()),
            issues: IssueDetector::new(config.clone()),
            recommendations: RecommendationEngine::new(config.clone()),
            config,
        })
    }
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn analyze(&self, input: PageInput) -> AnalysisResult {
        self.analyze_with_cancel(input, CancellationToken::new()).await
    }

    /// Run the pipeline under the configured deadline, stopping early when
    /// `cancel` fires.
    pub async fn analyze_with_cancel(&self, input: PageInput, cancel: CancellationToken) -> AnalysisResult {
        let version = self.config.version.clone();

        let page_url = match parse_page_url(&input.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("[PIPELINE] Rejecting input: {}", e);
                return AnalysisResult::fallback(&input.url, AnalysisStatus::Failed, &version, e.to_string());
            }
        };

        let deadline_ms = self.config.pipeline.run_timeout_ms;
        let pipeline = AssertUnwindSafe(self.run_pipeline(&input, &page_url, &cancel)).catch_unwind();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
            res = tokio::time::timeout(Duration::from_millis(deadline_ms), pipeline) => match res {
                Err(_) => Err(AnalysisError::Timeout(deadline_ms)),
                Ok(Err(panic)) => Err(AnalysisError::Other(anyhow::anyhow!(
                    "pipeline panicked: {}",
                    panic_message(panic.as_ref())
                ))),
                Ok(Ok(result)) => result,
            },
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("[PIPELINE] {} fell back: {}", input.url, e);
                AnalysisResult::fallback(&input.url, AnalysisStatus::CompletedWithFallback, &version, e.to_string())
            }
        }
    }

    async fn run_pipeline(&self, input: &PageInput, page_url: &Url, cancel: &CancellationToken) -> Result<AnalysisResult> {
        let mut timer = PhaseTimer::start();
        tracing::info!("[PIPELINE] Analyzing {} (rendered={})", page_url, input.rendered);

        // Extraction
        let (extraction, performance, resources) = self.extract(input, page_url).await?;
        if cancel.is_cancelled() {
            tracing::warn!("[PIPELINE] {} cancelled after extraction", page_url);
            return Err(AnalysisError::Cancelled);
        }
        let ExtractionOutput {
            mut technical,
            on_page,
            content,
            structured_data,
            degraded,
        } = extraction;
        if let Some(t) = technical.known_mut() {
            t.robots_txt_status = resources.robots_txt;
            t.sitemap_status = resources.sitemap;
        }
        let facts = PageFacts {
            url: input.url.clone(),
            rendered: input.rendered,
            technical,
            on_page,
            content,
            structured_data,
            performance,
        };
        timer.lap(Phase::Extraction);

        // Scoring
        let (scores, weighted_score) = guard_phase(Phase::Scoring, || {
            let scores = self.scoring.score_categories(&facts);
            let weighted = self.scoring.weighted_score(&scores)?;
            Ok((scores, weighted))
        })?;
        timer.lap(Phase::Scoring);

        // Content insights
        let reference_time = input
            .reference_time
            .or_else(|| input.response.header("date").and_then(parse_date));
        let insights = guard_phase(Phase::ContentInsights, || {
            Ok(self.insights.analyze(&facts, reference_time))
        })?;
        timer.lap(Phase::ContentInsights);

        // Issue detection
        let issues = guard_phase(Phase::IssueDetection, || {
            Ok(self.issues.report(&facts, &scores, &insights))
        })?;
        timer.lap(Phase::IssueDetection);

        // Recommendations
        let recommendations = guard_phase(Phase::Recommendations, || {
            Ok(self.recommendations.recommend(&facts, &insights, &issues))
        })?;
        timer.lap(Phase::Recommendations);

        // Aggregation
        let (risk, overall_score) = self.scoring.risk_adjust(
            weighted_score,
            issues.by_severity.critical.len(),
            issues.by_severity.high.len(),
        );
        let confidence = compute_confidence(
            &self.config.confidence,
            facts.performance.is_some(),
            facts.rendered,
            !degraded.is_empty(),
            issues.total,
        );
        timer.lap(Phase::Aggregation);

        tracing::info!(
            "[PIPELINE] {} analyzed in {}ms: overall={} confidence={} issues={} degraded={:?}",
            page_url,
            timer.elapsed_ms(),
            overall_score,
            confidence,
            issues.total,
            degraded
        );

        Ok(AnalysisResult {
            url: input.url.clone(),
            status: AnalysisStatus::Completed,
            config_version: self.config.version.clone(),
            facts,
            scores,
            weighted_score,
            risk,
            overall_score,
            insights,
            issues,
            recommendations,
            confidence,
            degraded_modules: degraded,
            phase_timings: timer.into_timings(),
            error: None,
        })
    }

    /// Extraction on a blocking worker, joined with both collaborators.
    async fn extract(
        &self,
        input: &PageInput,
        page_url: &Url,
    ) -> Result<(ExtractionOutput, Option<PerformanceMetrics>, SiteResources)> {
        let suite = self.extraction.clone();
        let html = input.html.clone();
        let response = input.response.clone();
        let url = page_url.clone();
        let modules = tokio::task::spawn_blocking(move || suite.run(&html, &response, &url));

        let (modules, performance, resources) =
            tokio::join!(modules, self.fetch_metrics(page_url), self.check_resources(page_url));

        let modules = modules.map_err(|e| {
            let message = if e.is_panic() {
                format!("extraction panicked: {}", panic_message(e.into_panic().as_ref()))
            } else {
                e.to_string()
            };
            AnalysisError::phase(Phase::Extraction, message)
        })?;

        Ok((modules, performance, resources))
    }

    /// Metrics failures and timeouts mean "no metrics", never a failed run.
    async fn fetch_metrics(&self, page_url: &Url) -> Option<PerformanceMetrics> {
        let limit = Duration::from_millis(self.config.pipeline.collaborator_timeout_ms);
        match tokio::time::timeout(limit, self.metrics.metrics(page_url)).await {
            Ok(Ok(metrics)) => {
                tracing::debug!("[METRICS] {} returned metrics: {}", self.metrics.name(), metrics.is_some());
                metrics
            }
            Ok(Err(e)) => {
                let err = AnalysisError::collaborator(self.metrics.name(), format!("{:#}", e));
                tracing::warn!("[METRICS] {}", err);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "[METRICS] {} timed out after {}ms",
                    self.metrics.name(),
                    limit.as_millis()
                );
                None
            }
        }
    }

    /// Checker failures and timeouts leave both resources `not_checked`.
    async fn check_resources(&self, page_url: &Url) -> SiteResources {
        let limit = Duration::from_millis(self.config.pipeline.collaborator_timeout_ms);
        match tokio::time::timeout(limit, self.resources.check(page_url)).await {
            Ok(Ok(resources)) => resources,
            Ok(Err(e)) => {
                let err = AnalysisError::collaborator(self.resources.name(), format!("{:#}", e));
                tracing::warn!("[RESOURCE] {}", err);
                SiteResources::default()
            }
            Err(_) => {
                tracing::warn!(
                    "[RESOURCE] {} timed out after {}ms",
                    self.resources.name(),
                    limit.as_millis()
                );
                SiteResources::default()
            }
        }
    }
}

fn parse_page_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(AnalysisError::InvalidUrl(format!(
            "{}: unsupported scheme '{}' or missing host",
            raw, scheme
        ))),
    }
}

/// Run one synchronous phase, turning a panic into a phase error.
fn guard_phase<T>(phase: Phase, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.map_err(|e| match e {
            AnalysisError::Phase { .. } => e,
            other => AnalysisError::phase(phase, other.to_string()),
        }),
        Err(panic) => Err(AnalysisError::phase(
            phase,
            format!("panicked: {}", panic_message(panic.as_ref())),
        )),
    }
}

/// Confidence in the result, 0-100.
///
/// Without degradation the value is clamped to `[floor_when_healthy, 100]`;
/// with degradation it is reported as computed, floored at 0.
pub fn compute_confidence(
    config: &ConfidenceConfig,
    has_metrics: bool,
    rendered: bool,
    degraded: bool,
    issue_count: usize,
) -> u8 {
    let mut confidence: i32 = 100;
    if !has_metrics {
        confidence -= config.no_metrics as i32;
    }
    if !rendered {
        confidence -= config.not_rendered as i32;
    }
    if degraded {
        confidence -= config.degraded as i32;
    }
    if issue_count < config.few_issues_threshold {
        confidence -= config.few_issues as i32;
    }

    if degraded {
        confidence.clamp(0, 100) as u8
    } else {
        confidence.clamp(config.floor_when_healthy as i32, 100) as u8
    }
}
