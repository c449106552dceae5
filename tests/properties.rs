//! Property tests for score bounds, risk monotonicity and recommendation invariants.

use std::sync::Arc;

use proptest::prelude::*;

use seo_pulse::config::{AnalysisConfig, ConfidenceConfig};
use seo_pulse::domain::models::{BusinessImpact, FixComplexity, OnPageFacts, Severity};
use seo_pulse::service::orchestrator::compute_confidence;
use seo_pulse::service::recommendations::{strategic_value, RecommendationEngine};
use seo_pulse::service::ScoringEngine;
use seo_pulse::test_utils::fixtures::issue;

fn engine() -> ScoringEngine {
    ScoringEngine::new(Arc::new(AnalysisConfig::default()))
}

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
    ]
}

fn complexity() -> impl Strategy<Value = FixComplexity> {
    prop_oneof![
        Just(FixComplexity::Easy),
        Just(FixComplexity::Medium),
        Just(FixComplexity::Hard),
    ]
}

fn impact() -> impl Strategy<Value = BusinessImpact> {
    prop_oneof![
        Just(BusinessImpact::Low),
        Just(BusinessImpact::Medium),
        Just(BusinessImpact::High),
    ]
}

proptest! {
    #[test]
    fn test_overall_score_stays_in_range(weighted in 0.0f64..=100.0, critical in 0usize..20, high in 0usize..20) {
        let (_, overall) = engine().risk_adjust(weighted, critical, high);
        prop_assert!(overall <= 100);
    }

    #[test]
    fn test_extra_critical_issue_never_raises_score(weighted in 0.0f64..=100.0, critical in 0usize..15, high in 0usize..15) {
        let (_, before) = engine().risk_adjust(weighted, critical, high);
        let (_, after) = engine().risk_adjust(weighted, critical + 1, high);
        prop_assert!(after <= before);
    }

    #[test]
    fn test_on_page_score_stays_in_range(
        missing_alt in 0usize..500,
        title_length in 0usize..200,
        has_title in any::<bool>(),
        h1s in 0usize..5,
        internal_links in 0usize..50,
    ) {
        let mut facts = OnPageFacts {
            images_missing_alt_count: missing_alt,
            title_length,
            title: has_title.then(|| "t".repeat(title_length)),
            internal_links,
            ..Default::default()
        };
        facts.headings.h1 = vec!["Heading".to_string(); h1s];

        let score = engine().on_page(&facts);
        prop_assert!(score.score <= 100);
        prop_assert!(score.breakdown.values().all(|s| s.score <= 100));
    }

    #[test]
    fn test_strategic_value_is_clamped(base in -20i32..20, impact in impact(), complexity in complexity()) {
        let value = strategic_value(base, impact, complexity);
        prop_assert!((1..=10).contains(&value));
    }

    #[test]
    fn test_quick_wins_are_always_easy(severity in severity(), complexity in complexity(), impact in impact()) {
        let engine = RecommendationEngine::new(Arc::new(AnalysisConfig::default()));
        let rec = engine.from_issue(&issue("generated", severity, complexity, impact));
        prop_assert!(!rec.quick_win || rec.fix_complexity == FixComplexity::Easy);
        prop_assert!((1..=10).contains(&rec.strategic_value));
    }

    #[test]
    fn test_confidence_respects_bounds(
        has_metrics in any::<bool>(),
        rendered in any::<bool>(),
        degraded in any::<bool>(),
        issues in 0usize..20,
    ) {
        let config = ConfidenceConfig::default();
        let confidence = compute_confidence(&config, has_metrics, rendered, degraded, issues);
        prop_assert!(confidence <= 100);
        if !degraded {
            prop_assert!(confidence >= config.floor_when_healthy);
        }
    }
}
