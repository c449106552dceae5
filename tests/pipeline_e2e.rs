//! End-to-end tests for the single-page analysis pipeline.
//!
//! Every test drives `Orchestrator::analyze` with in-memory HTML, so no
//! network access is needed.

use std::collections::BTreeSet;
use std::sync::Arc;

use scraper::Html;
use url::Url;

use seo_pulse::domain::models::{
    AnalysisResult, AnalysisStatus, Category, FixComplexity, PageInput, ResponseMeta, Severity,
    StructuredDataFacts,
};
use seo_pulse::error::{AnalysisError, Result};
use seo_pulse::extractor::{ExtractionSuite, FactExtractor};
use seo_pulse::service::{NoMetrics, Orchestrator, StaticMetrics};
use seo_pulse::test_utils::assertions::{has_issue, severity_of, without_timings};
use seo_pulse::test_utils::fixtures;
use seo_pulse::ProgressSummary;

/// Orchestrator with good runtime metrics available.
fn with_metrics() -> Orchestrator {
    Orchestrator::builder()
        .metrics(Arc::new(StaticMetrics::new(fixtures::good_metrics())))
        .build()
        .expect("default config is valid")
}

fn without_metrics() -> Orchestrator {
    Orchestrator::builder()
        .metrics(Arc::new(NoMetrics))
        .build()
        .expect("default config is valid")
}

fn healthy_input() -> PageInput {
    PageInput::new(fixtures::PAGE_URL, fixtures::healthy_page_html())
        .with_response(fixtures::secure_response())
        .rendered(true)
        .with_reference_time(fixtures::reference_time())
}

/// No title, plain HTTP, about fifty words of text.
fn insecure_thin_input() -> PageInput {
    PageInput::new(
        "http://example.com/guides/rust-seo",
        fixtures::page_html(None, 50, None),
    )
    .with_response(ResponseMeta::ok())
}

#[tokio::test]
async fn test_insecure_untitled_thin_page() {
    let result = without_metrics().analyze(insecure_thin_input()).await;

    assert_eq!(result.status, AnalysisStatus::Completed);
    assert_eq!(severity_of(&result, "missing-title"), Some(Severity::Critical));
    assert_eq!(severity_of(&result, "no-ssl"), Some(Severity::Critical));

    let thin = severity_of(&result, "thin-content").expect("thin content detected");
    assert!(matches!(thin, Severity::Critical | Severity::High | Severity::Medium));

    assert!(result.scores.technical.score <= 80, "technical={}", result.scores.technical.score);
    assert!(result.scores.content.score <= 80, "content={}", result.scores.content.score);
    assert!(result.risk.critical_issues >= 2);
}

#[tokio::test]
async fn test_article_page_with_valid_schema() {
    let result = with_metrics().analyze(healthy_input()).await;

    assert_eq!(result.status, AnalysisStatus::Completed);
    let schema = result.facts.structured_data.known().expect("structured data known");
    assert!(schema.rich_results_eligible);
    assert!(!schema.duplicate_schemas);
    assert!(schema.schema_types.contains("Article"));
    assert!(schema.json_ld_errors.is_empty());

    let on_page = result.facts.on_page.known().unwrap();
    assert_eq!(on_page.title_length, 45);
    assert!(result.facts.word_count().unwrap() >= 1000);
    assert!(result.facts.has_https().unwrap());

    assert_eq!(result.issue_count(Severity::Critical), 0, "critical: {:?}", result.issues.by_severity.critical);
}

struct FailingSchema;

impl FactExtractor for FailingSchema {
    type Facts = StructuredDataFacts;

    fn name(&self) -> &'static str {
        "structured_data"
    }

    fn extract(&self, _: &Html, _: &ResponseMeta, _: &Url) -> Result<StructuredDataFacts> {
        Err(AnalysisError::extraction("structured_data", "unsupported markup"))
    }
}

#[tokio::test]
async fn test_failed_extractor_degrades_one_category() {
    let orchestrator = Orchestrator::builder()
        .extraction(ExtractionSuite {
            structured_data: Arc::new(FailingSchema),
            ..Default::default()
        })
        .metrics(Arc::new(StaticMetrics::new(fixtures::good_metrics())))
        .build()
        .unwrap();

    let result = orchestrator.analyze(healthy_input()).await;

    assert_eq!(result.status, AnalysisStatus::Completed);
    assert!(result.facts.technical.is_known());
    assert!(result.facts.on_page.is_known());
    assert!(result.facts.content.is_known());
    assert!(!result.facts.structured_data.is_known());
    assert!(!result.scores.structured_data.known);
    assert_eq!(result.degraded_modules, vec!["structured_data".to_string()]);
    assert!(result.confidence < 100);
    assert!(result
        .issues
        .by_severity
        .iter()
        .all(|i| i.category != Category::StructuredData));
}

#[tokio::test]
async fn test_missing_metrics_costs_exactly_fifteen_confidence() {
    let with = with_metrics().analyze(healthy_input()).await;
    let without = without_metrics().analyze(healthy_input()).await;

    assert_eq!(with.issues.total, without.issues.total);
    assert!(with.scores.ux.is_some());
    assert!(without.scores.ux.is_none());
    assert_eq!(with.confidence - without.confidence, 15);
}

#[tokio::test]
async fn test_identical_input_gives_identical_output() {
    let orchestrator = with_metrics();
    let first = without_timings(orchestrator.analyze(healthy_input()).await);
    let second = without_timings(orchestrator.analyze(healthy_input()).await);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let thin_a = without_timings(orchestrator.analyze(insecure_thin_input()).await);
    let thin_b = without_timings(orchestrator.analyze(insecure_thin_input()).await);
    assert_eq!(thin_a, thin_b);
}

#[tokio::test]
async fn test_json_round_trip_keeps_scores_and_issues() {
    let result = without_metrics().analyze(insecure_thin_input()).await;
    let json = serde_json::to_string(&result).unwrap();
    let back: AnalysisResult = serde_json::from_str(&json).unwrap();

    assert_eq!(back.scores.known(), result.scores.known());
    assert_eq!(back.overall_score, result.overall_score);
    assert_eq!(back.issues.by_severity, result.issues.by_severity);
    assert_eq!(back.issues.prioritization, result.issues.prioritization);
    assert_eq!(back.status, result.status);
}

#[tokio::test]
async fn test_every_issue_lands_in_one_group_and_one_bucket() {
    let result = without_metrics().analyze(insecure_thin_input()).await;
    let issues = &result.issues;

    let grouped: usize = Severity::ALL.iter().map(|s| issues.by_severity.group(*s).len()).sum();
    assert_eq!(grouped, issues.total);

    let p = &issues.prioritization;
    let bucketed: Vec<&String> = p.immediate.iter().chain(&p.short_term).chain(&p.long_term).collect();
    assert_eq!(bucketed.len(), issues.total);
    let unique: BTreeSet<&String> = bucketed.iter().copied().collect();
    assert_eq!(unique.len(), issues.total);

    let ids: BTreeSet<&String> = issues.by_severity.iter().map(|i| &i.id).collect();
    assert_eq!(ids, unique);
}

#[tokio::test]
async fn test_recommendations_follow_issues() {
    let result = without_metrics().analyze(insecure_thin_input()).await;
    let recs = &result.recommendations;

    for issue in result.issues.by_severity.iter() {
        let rec_id = format!("rec-{}", issue.id);
        assert_eq!(recs.items.iter().filter(|r| r.id == rec_id).count(), 1, "{}", rec_id);
    }
    assert!(recs
        .items
        .iter()
        .all(|r| !r.quick_win || r.fix_complexity == FixComplexity::Easy));
    assert!(recs.items.iter().any(|r| r.id == "rec-performance-monitoring"));

    let weights: Vec<u8> = recs.items.iter().map(|r| r.priority.weight()).collect();
    assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(recs.items[0].id, "rec-no-ssl");
}

#[tokio::test]
async fn test_unparsable_url_returns_typed_failure() {
    let result = with_metrics()
        .analyze(PageInput::new("::not a url::", "<html></html>"))
        .await;

    assert_eq!(result.status, AnalysisStatus::Failed);
    assert_eq!(result.overall_score, 0);
    assert_eq!(result.confidence, 0);
    assert!(result.issues.by_severity.is_empty());
    assert!(serde_json::to_string(&result).is_ok());
}

#[tokio::test]
async fn test_progress_summary_matches_result() {
    let result = without_metrics().analyze(insecure_thin_input()).await;
    let summary = ProgressSummary::from(&result);

    assert_eq!(summary.url, result.url);
    assert_eq!(summary.overall_score, result.overall_score);
    assert_eq!(summary.critical_issues, result.issue_count(Severity::Critical));
    assert_eq!(summary.total_issues, result.issues.total);
    assert!(has_issue(&result, "no-ssl"));
}
