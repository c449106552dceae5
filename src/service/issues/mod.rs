//! Issue detection and prioritization.
//!
//! Rules run in table order, single-category rules first, then the
//! cross-category set. Each matched rule yields exactly one `Issue`.

pub mod prioritization;
pub mod rules;

pub use prioritization::{build_report, bucket, Bucket};
pub use rules::{Finding, Rule, RuleContext, CROSS_CATEGORY_RULES, RULES};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::domain::models::{CategoryScores, ContentInsights, Issue, IssueReport, PageFacts};

pub struct IssueDetector {
    config: Arc<AnalysisConfig>,
}

impl IssueDetector {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Matched issues in detection order.
    pub fn detect(&self, facts: &PageFacts, scores: &CategoryScores, insights: &ContentInsights) -> Vec<Issue> {
        let ctx = RuleContext {
            facts,
            scores,
            insights,
            thresholds: &self.config.thresholds,
        };

        let mut seen = BTreeSet::new();
        let mut issues = Vec::new();
        for rule in RULES.iter().chain(CROSS_CATEGORY_RULES) {
            let Some(finding) = (rule.check)(&ctx) else {
                continue;
            };
            if !seen.insert(rule.id) {
                tracing::warn!("[ISSUES] rule {} matched twice, keeping the first", rule.id);
                continue;
            }
            tracing::debug!("[ISSUES] {} ({})", rule.id, rule.severity.as_str());
            issues.push(to_issue(rule, finding));
        }

        issues
    }

    /// Detect, partition and prioritize in one step.
    pub fn report(&self, facts: &PageFacts, scores: &CategoryScores, insights: &ContentInsights) -> IssueReport {
        let report = build_report(self.detect(facts, scores, insights));
        tracing::info!(
            "[ISSUES] {} issues (critical={}, high={}, medium={}, low={})",
            report.total,
            report.by_severity.critical.len(),
            report.by_severity.high.len(),
            report.by_severity.medium.len(),
            report.by_severity.low.len()
        );
        report
    }
}

fn to_issue(rule: &Rule, finding: Finding) -> Issue {
    Issue {
        id: rule.id.to_string(),
        kind: rule.kind,
        title: rule.title.to_string(),
        description: finding.description,
        severity: rule.severity,
        category: rule.category,
        fix_complexity: rule.fix_complexity,
        business_impact: rule.business_impact,
        affected_elements: finding.affected_elements,
        affected_categories: rule.affected_categories.to_vec(),
        implementation_steps: rule.steps.iter().map(|s| s.to_string()).collect(),
        validation_criteria: rule.validation.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::models::{
        BusinessImpact as Impact, Category, ContentFacts, Extracted, FixComplexity as Fix,
        HreflangLink, OnPageFacts, PerformanceMetrics, ResourceStatus, Severity,
        StructuredDataFacts, TechnicalFacts,
    };
    use crate::service::insights::ContentInsightsAnalyzer;
    use crate::service::scoring::ScoringEngine;
    use crate::test_utils::fixtures;

    fn detect(facts: &PageFacts) -> Vec<Issue> {
        let config = Arc::new(AnalysisConfig::default());
        let scores = ScoringEngine::new(config.clone()).score_categories(facts);
        let insights = ContentInsightsAnalyzer::new(config.clone()).analyze(facts, None);
        IssueDetector::new(config).detect(facts, &scores, &insights)
    }

    /// Like `detect`, with freshness anchored at the fixture reference time.
    fn detect_dated(facts: &PageFacts) -> Vec<Issue> {
        let config = Arc::new(AnalysisConfig::default());
        let scores = ScoringEngine::new(config.clone()).score_categories(facts);
        let insights = ContentInsightsAnalyzer::new(config.clone())
            .analyze(facts, Some(fixtures::reference_time()));
        IssueDetector::new(config).detect(facts, &scores, &insights)
    }

    fn ids(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_healthy_page_has_no_severe_issues() {
        let issues = detect(&fixtures::healthy_page_facts());
        assert!(
            issues.iter().all(|i| !i.severity.is_severe()),
            "unexpected severe issues: {:?}",
            ids(&issues)
        );
    }

    #[test]
    fn test_missing_title_and_https_are_critical() {
        let mut facts = fixtures::healthy_page_facts();
        if let Some(t) = facts.technical.known_mut() {
            t.has_https = false;
        }
        if let Some(o) = facts.on_page.known_mut() {
            o.title = None;
            o.title_length = 0;
        }
        let issues = detect(&facts);
        for id in ["no-ssl", "missing-title"] {
            let issue = issues.iter().find(|i| i.id == id).expect(id);
            assert_eq!(issue.severity, Severity::Critical);
        }
    }

    #[test]
    fn test_title_too_long_is_high() {
        let mut facts = fixtures::healthy_page_facts();
        if let Some(o) = facts.on_page.known_mut() {
            o.title = Some("x".repeat(75));
            o.title_length = 75;
        }
        let issues = detect(&facts);
        let issue = issues.iter().find(|i| i.id == "title-too-long").unwrap();
        assert_eq!(issue.severity, Severity::High);
    }

    #[test]
    fn test_performance_score_below_thirty_is_critical() {
        let mut facts = fixtures::healthy_page_facts();
        facts.performance = Some(PerformanceMetrics {
            performance_score: Some(22.0),
            ..Default::default()
        });
        let issues = detect(&facts);
        assert!(ids(&issues).contains(&"poor-performance-score"));
        assert!(!ids(&issues).contains(&"low-performance-score"));
    }

    #[test]
    fn test_rules_for_unknown_module_are_skipped() {
        let mut facts = fixtures::healthy_page_facts();
        facts.on_page = Extracted::unknown("boom");
        let issues = detect(&facts);
        assert!(issues.iter().all(|i| i.category != Category::OnPage));
        assert!(!ids(&issues).contains(&"missing-title"));
    }

    #[test]
    fn test_cross_category_rule_tags_categories() {
        let mut facts = fixtures::healthy_page_facts();
        if let Some(t) = facts.technical.known_mut() {
            t.responsive_viewport = false;
            t.viewport = Some("width=1024".into());
        }
        facts.performance = Some(PerformanceMetrics {
            lcp_ms: Some(3200.0),
            ..Default::default()
        });
        let issues = detect(&facts);
        let gap = issues.iter().find(|i| i.id == "mobile-experience-gap").unwrap();
        assert_eq!(gap.affected_categories, vec![Category::Technical, Category::Ux]);
    }

    // ====== One mutation per rule ======

    type Mutation = fn(&mut PageFacts);

    fn tech(facts: &mut PageFacts) -> &mut TechnicalFacts {
        facts.technical.known_mut().unwrap()
    }

    fn page(facts: &mut PageFacts) -> &mut OnPageFacts {
        facts.on_page.known_mut().unwrap()
    }

    fn text(facts: &mut PageFacts) -> &mut ContentFacts {
        facts.content.known_mut().unwrap()
    }

    fn schema(facts: &mut PageFacts) -> &mut StructuredDataFacts {
        facts.structured_data.known_mut().unwrap()
    }

    fn metrics(facts: &mut PageFacts) -> &mut PerformanceMetrics {
        facts.performance.get_or_insert_with(fixtures::good_metrics)
    }

    type RuleCase = (&'static str, Severity, Fix, Impact, Mutation);

    fn case(id: &'static str, severity: Severity, fix: Fix, impact: Impact, mutate: Mutation) -> RuleCase {
        (id, severity, fix, impact, mutate)
    }

    fn rule_cases() -> Vec<RuleCase> {
        vec![
            // Technical
            case("no-ssl", Severity::Critical, Fix::Easy, Impact::High, |f| tech(f).has_https = false),
            case("noindex-directive", Severity::Critical, Fix::Easy, Impact::High, |f| {
                tech(f).noindex = true;
                tech(f).robots_meta = Some("noindex".into());
            }),
            case("http-error-status", Severity::Critical, Fix::Medium, Impact::High, |f| tech(f).status_code = 404),
            case("missing-viewport", Severity::High, Fix::Easy, Impact::High, |f| {
                tech(f).viewport = None;
                tech(f).responsive_viewport = false;
            }),
            case("non-responsive-viewport", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                tech(f).viewport = Some("width=1024".into());
                tech(f).responsive_viewport = false;
            }),
            case("missing-canonical", Severity::Medium, Fix::Easy, Impact::Medium, |f| tech(f).canonical = None),
            case("missing-security-headers", Severity::Medium, Fix::Medium, Impact::Low, |f| {
                let t = tech(f);
                for header in ["content-security-policy", "permissions-policy", "referrer-policy"] {
                    t.security_headers.remove(header);
                    t.missing_security_headers.insert(header.to_string());
                }
            }),
            case("missing-robots-txt", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                tech(f).robots_txt_status = ResourceStatus::Missing
            }),
            case("missing-sitemap", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                tech(f).sitemap_status = ResourceStatus::Missing
            }),
            case("invalid-hreflang", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                tech(f).hreflang.push(HreflangLink {
                    lang: "english".into(),
                    href: "https://example.com/en/".into(),
                    valid: false,
                })
            }),
            case("redirected-url", Severity::Low, Fix::Medium, Impact::Low, |f| {
                tech(f).redirected = true;
                tech(f).redirect_count = 1;
            }),
            case("no-compression", Severity::Low, Fix::Easy, Impact::Low, |f| tech(f).compression = None),
            case("no-http2", Severity::Low, Fix::Medium, Impact::Low, |f| tech(f).http2 = Some(false)),
            // On-page
            case("missing-title", Severity::Critical, Fix::Easy, Impact::High, |f| {
                page(f).title = None;
                page(f).title_length = 0;
            }),
            case("title-too-short", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                page(f).title = Some("Rust SEO".into());
                page(f).title_length = 8;
            }),
            case("title-too-long", Severity::High, Fix::Easy, Impact::Medium, |f| {
                page(f).title = Some("Rust ".repeat(15));
                page(f).title_length = 75;
            }),
            case("missing-meta-description", Severity::High, Fix::Easy, Impact::High, |f| {
                page(f).meta_description = None;
                page(f).meta_description_length = 0;
            }),
            case("meta-description-length", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                page(f).meta_description = Some("Too short.".into());
                page(f).meta_description_length = 10;
            }),
            case("missing-h1", Severity::High, Fix::Easy, Impact::High, |f| page(f).headings.h1.clear()),
            case("multiple-h1", Severity::Medium, Fix::Easy, Impact::Low, |f| {
                page(f).headings.h1.push("Another main heading".into())
            }),
            case("heading-hierarchy-skip", Severity::Low, Fix::Easy, Impact::Low, |f| {
                page(f).heading_hierarchy_skips.push("h2→h4".into())
            }),
            case("images-missing-alt", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                page(f).images_missing_alt_count = 1;
                page(f).images_missing_alt = vec!["https://example.com/img/chart.png".into()];
            }),
            case("missing-open-graph", Severity::Low, Fix::Easy, Impact::Medium, |f| page(f).open_graph.image = None),
            case("missing-twitter-card", Severity::Low, Fix::Easy, Impact::Low, |f| page(f).twitter_card = None),
            case("canonical-mismatch", Severity::High, Fix::Easy, Impact::High, |f| {
                page(f).canonical_matches_url = Some(false)
            }),
            case("missing-lang", Severity::Low, Fix::Easy, Impact::Low, |f| page(f).lang = None),
            case("missing-favicon", Severity::Low, Fix::Easy, Impact::Low, |f| page(f).has_favicon = false),
            case("no-internal-links", Severity::Medium, Fix::Medium, Impact::Medium, |f| page(f).internal_links = 0),
            // Content
            case("thin-content", Severity::High, Fix::Hard, Impact::High, |f| {
                text(f).thin_content = true;
                text(f).word_count = 60;
            }),
            case("low-word-count", Severity::Medium, Fix::Medium, Impact::Medium, |f| text(f).word_count = 250),
            case("poor-readability", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                text(f).readability.flesch_reading_ease = 40.0
            }),
            case("long-sentences", Severity::Low, Fix::Medium, Impact::Low, |f| text(f).avg_words_per_sentence = 30.0),
            case("few-paragraphs", Severity::Low, Fix::Easy, Impact::Low, |f| text(f).paragraph_count = 2),
            case("no-subheadings", Severity::Medium, Fix::Easy, Impact::Medium, |f| text(f).subheading_count = 0),
            case("duplicate-h1", Severity::Medium, Fix::Easy, Impact::Low, |f| text(f).duplicate_h1 = true),
            case("low-lexical-diversity", Severity::Low, Fix::Hard, Impact::Low, |f| text(f).lexical_diversity = 0.2),
            case("keyword-stuffing", Severity::High, Fix::Medium, Impact::High, |f| {
                text(f).top_keywords[0].density = 4.5
            }),
            case("keyword-not-in-title", Severity::Medium, Fix::Easy, Impact::Medium, |f| {
                text(f).top_keywords[0].keyword = "benchmarking".into()
            }),
            case("stale-content", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                let old = Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap();
                text(f).published_at = Some(old);
                text(f).modified_at = Some(old);
                schema(f).date_published = Some(old);
                schema(f).date_modified = Some(old);
            }),
            // Structured data
            case("missing-structured-data", Severity::High, Fix::Medium, Impact::Medium, |f| {
                f.structured_data = Extracted::Known(StructuredDataFacts::default())
            }),
            case("invalid-json-ld", Severity::High, Fix::Easy, Impact::Medium, |f| {
                schema(f).json_ld_errors.push("block 2: expected value at line 1 column 1".into())
            }),
            case("no-rich-result-schema", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                schema(f).rich_results_eligible = false;
                schema(f).rich_result_types.clear();
            }),
            case("duplicate-schema", Severity::Medium, Fix::Easy, Impact::Low, |f| {
                schema(f).duplicate_schemas = true;
                schema(f).duplicate_types.insert("Article".into());
            }),
            // Runtime metrics
            case("poor-performance-score", Severity::Critical, Fix::Hard, Impact::High, |f| {
                metrics(f).performance_score = Some(22.0)
            }),
            case("low-performance-score", Severity::High, Fix::Hard, Impact::High, |f| {
                metrics(f).performance_score = Some(40.0)
            }),
            case("slow-lcp", Severity::High, Fix::Hard, Impact::High, |f| metrics(f).lcp_ms = Some(4500.0)),
            case("slow-interaction", Severity::High, Fix::Hard, Impact::Medium, |f| metrics(f).inp_ms = Some(650.0)),
            case("layout-shift", Severity::Medium, Fix::Medium, Impact::Medium, |f| metrics(f).cls = Some(0.4)),
            case("slow-server-response", Severity::Medium, Fix::Hard, Impact::Medium, |f| {
                metrics(f).ttfb_ms = Some(2200.0)
            }),
            case("accessibility-issues", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                metrics(f).accessibility_score = Some(40.0)
            }),
            // Cross-category
            case("mobile-experience-gap", Severity::High, Fix::Medium, Impact::High, |f| {
                tech(f).viewport = Some("width=1024".into());
                tech(f).responsive_viewport = false;
                metrics(f).lcp_ms = Some(3200.0);
            }),
            case("indexing-conflict", Severity::Critical, Fix::Easy, Impact::High, |f| tech(f).noindex = true),
            case("thin-unstructured", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                text(f).thin_content = true;
                text(f).word_count = 60;
                f.structured_data = Extracted::Known(StructuredDataFacts::default());
            }),
            case("schema-content-mismatch", Severity::Medium, Fix::Medium, Impact::Medium, |f| {
                text(f).word_count = 250
            }),
        ]
    }

    #[test]
    fn test_every_rule_has_a_case() {
        let covered: BTreeSet<&str> = rule_cases().iter().map(|c| c.0).collect();
        let table: BTreeSet<&str> = RULES.iter().chain(CROSS_CATEGORY_RULES).map(|r| r.id).collect();
        assert_eq!(covered, table);
    }

    #[test]
    fn test_each_rule_fires_on_its_mutation_only() {
        let healthy = detect_dated(&fixtures::healthy_page_facts());

        for (id, severity, fix, impact, mutate) in rule_cases() {
            assert!(!ids(&healthy).contains(&id), "{} fired on the healthy page", id);

            let mut facts = fixtures::healthy_page_facts();
            mutate(&mut facts);
            let issues = detect_dated(&facts);
            let issue = issues
                .iter()
                .find(|i| i.id == id)
                .unwrap_or_else(|| panic!("{} did not fire, got {:?}", id, ids(&issues)));

            assert_eq!(issue.severity, severity, "{}", id);
            assert_eq!(issue.fix_complexity, fix, "{}", id);
            assert_eq!(issue.business_impact, impact, "{}", id);
            assert!(!issue.description.is_empty(), "{}", id);
        }
    }

    #[test]
    fn test_detection_is_deterministic() {
        let facts = fixtures::thin_page_facts();
        assert_eq!(detect(&facts), detect(&facts));
    }
}
