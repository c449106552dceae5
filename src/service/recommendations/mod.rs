//! Recommendation engine: one recommendation per issue plus proactive
//! suggestions, sorted by priority and grouped into a strategy.

pub mod templates;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::domain::models::{
    BusinessImpact, BusinessImpactEstimate, Category, ContentInsights, Difficulty, FixComplexity,
    FreshnessStatus, ImplementationPlan, Issue, IssueReport, PageFacts, Priority, Recommendation,
    RecommendationReport, RecommendationSource, Severity, Strategy, Timeline,
};

pub fn priority_for(severity: Severity) -> Priority {
    match severity {
        Severity::Critical => Priority::Immediate,
        Severity::High => Priority::High,
        Severity::Medium => Priority::Medium,
        Severity::Low => Priority::Low,
    }
}

pub fn timeline_for(priority: Priority) -> Timeline {
    match priority {
        Priority::Immediate => Timeline::Immediate,
        Priority::High => Timeline::ShortTerm,
        Priority::Medium => Timeline::MediumTerm,
        Priority::Low => Timeline::LongTerm,
    }
}

pub fn difficulty_for(complexity: FixComplexity) -> Difficulty {
    match complexity {
        FixComplexity::Easy => Difficulty::Beginner,
        FixComplexity::Medium => Difficulty::Intermediate,
        FixComplexity::Hard => Difficulty::Advanced,
    }
}

fn hours_for(complexity: FixComplexity) -> u32 {
    match complexity {
        FixComplexity::Easy => 1,
        FixComplexity::Medium => 4,
        FixComplexity::Hard => 16,
    }
}

fn uplift_for(impact: BusinessImpact) -> &'static str {
    match impact {
        BusinessImpact::High => "5-15%",
        BusinessImpact::Medium => "2-5%",
        BusinessImpact::Low => "0-2%",
    }
}

/// `base + impact bonus + complexity bonus`, clamped to 1..=10.
pub fn strategic_value(base: i32, impact: BusinessImpact, complexity: FixComplexity) -> u8 {
    let impact_bonus = match impact {
        BusinessImpact::High => 2,
        BusinessImpact::Medium => 1,
        BusinessImpact::Low => 0,
    };
    let complexity_bonus = match complexity {
        FixComplexity::Easy => 2,
        FixComplexity::Medium => 1,
        FixComplexity::Hard => -1,
    };
    (base + impact_bonus + complexity_bonus).clamp(1, 10) as u8
}

pub struct RecommendationEngine {
    config: Arc<AnalysisConfig>,
}

impl RecommendationEngine {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    pub fn recommend(&self, facts: &PageFacts, insights: &ContentInsights, issues: &IssueReport) -> RecommendationReport {
        let mut items: Vec<Recommendation> = issues
            .by_severity
            .iter()
            .map(|issue| self.from_issue(issue))
            .collect();

        let mut ids: BTreeSet<String> = items.iter().map(|r| r.id.clone()).collect();
        for rec in self.proactive(facts, insights) {
            if ids.insert(rec.id.clone()) {
                items.push(rec);
            } else {
                tracing::debug!("[RECOMMEND] skipping proactive {} (id already used)", rec.id);
            }
        }

        // stable: equal keys keep issue-derived before proactive
        items.sort_by(|a, b| {
            b.priority
                .weight()
                .cmp(&a.priority.weight())
                .then(b.strategic_value.cmp(&a.strategic_value))
        });

        let strategy = self.strategy(&items);
        tracing::info!(
            "[RECOMMEND] {} recommendations ({} quick wins)",
            items.len(),
            strategy.quick_wins.len()
        );

        RecommendationReport { items, strategy }
    }

    pub fn from_issue(&self, issue: &Issue) -> Recommendation {
        let template = templates::lookup(issue.category, &issue.id);
        let priority = priority_for(issue.severity);
        let quick_win = issue.is_quick_win();

        Recommendation {
            id: format!("rec-{}", issue.id),
            issue_id: Some(issue.id.clone()),
            source: RecommendationSource::Issue,
            title: template.title.to_string(),
            description: format!("{} {}", template.description, issue.description),
            category: issue.category,
            priority,
            timeline: timeline_for(priority),
            strategic_value: strategic_value(
                self.config.recommendations.base_strategic_value,
                issue.business_impact,
                issue.fix_complexity,
            ),
            quick_win,
            fix_complexity: issue.fix_complexity,
            implementation: ImplementationPlan {
                steps: issue.implementation_steps.clone(),
                tools: template.tools.iter().map(|t| t.to_string()).collect(),
                difficulty: template
                    .difficulty
                    .unwrap_or_else(|| difficulty_for(issue.fix_complexity)),
                estimated_hours: template
                    .estimated_hours
                    .unwrap_or_else(|| hours_for(issue.fix_complexity)),
            },
            business_impact: BusinessImpactEstimate {
                level: issue.business_impact,
                estimated_traffic_uplift: template
                    .traffic_uplift
                    .unwrap_or_else(|| uplift_for(issue.business_impact))
                    .to_string(),
                summary: format!(
                    "Fixing \"{}\" has {} business impact.",
                    issue.title,
                    issue.business_impact.as_str()
                ),
            },
        }
    }

    /// Suggestions that do not come from a detected problem.
    pub fn proactive(&self, facts: &PageFacts, insights: &ContentInsights) -> Vec<Recommendation> {
        let mut out = Vec::new();
        let content = facts.content.known();
        let schema = facts.schema_types();

        if content
            .map(|c| c.word_count >= self.config.recommendations.content_hub_min_words)
            .unwrap_or(false)
        {
            out.push(self.proactive_rec(Proactive {
                id: "rec-content-hub",
                title: "Build a content hub around this page",
                description: "The page is long enough to anchor a topic cluster. Split subtopics into supporting pages and link them back here.",
                category: Category::Content,
                priority: Priority::Medium,
                complexity: FixComplexity::Hard,
                impact: BusinessImpact::High,
                steps: &[
                    "List the subtopics covered by each H2",
                    "Write a supporting page per subtopic",
                    "Link supporting pages to this page and back",
                ],
                tools: &["Keyword research tool", "Site architecture planner"],
                difficulty: Difficulty::Expert,
                hours: 40,
            }));
        }

        if let Some(types) = schema {
            if !types.contains("BreadcrumbList") {
                out.push(self.proactive_rec(Proactive {
                    id: "rec-breadcrumb-schema",
                    title: "Add breadcrumb structured data",
                    description: "BreadcrumbList markup shows the page's place in the site hierarchy in search results.",
                    category: Category::StructuredData,
                    priority: Priority::Low,
                    complexity: FixComplexity::Easy,
                    impact: BusinessImpact::Low,
                    steps: &["Emit a BreadcrumbList JSON-LD block matching the visible breadcrumb"],
                    tools: &["Rich Results Test"],
                    difficulty: Difficulty::Beginner,
                    hours: 1,
                }));
            }

            let has_question_headings = facts
                .on_page
                .known()
                .map(|o| o.headings.subheadings().any(|h| h.trim_end().ends_with('?')))
                .unwrap_or(false);
            if has_question_headings && !types.contains("FAQPage") {
                out.push(self.proactive_rec(Proactive {
                    id: "rec-faq-schema",
                    title: "Mark up questions with FAQ schema",
                    description: "Headings phrased as questions can be described with FAQPage markup.",
                    category: Category::StructuredData,
                    priority: Priority::Medium,
                    complexity: FixComplexity::Easy,
                    impact: BusinessImpact::Medium,
                    steps: &["Pair each question heading with its answer in a FAQPage JSON-LD block"],
                    tools: &["Rich Results Test"],
                    difficulty: Difficulty::Beginner,
                    hours: 2,
                }));
            }
        }

        if facts.performance.is_none() {
            out.push(self.proactive_rec(Proactive {
                id: "rec-performance-monitoring",
                title: "Set up performance monitoring",
                description: "No runtime metrics were available. Track Core Web Vitals to catch regressions.",
                category: Category::Ux,
                priority: Priority::Medium,
                complexity: FixComplexity::Medium,
                impact: BusinessImpact::Medium,
                steps: &[
                    "Collect field data with a RUM library or CrUX",
                    "Run lab audits in CI for key templates",
                ],
                tools: &["Lighthouse CI", "PageSpeed Insights", "web-vitals"],
                difficulty: Difficulty::Intermediate,
                hours: 6,
            }));
        }

        if insights.freshness.status == FreshnessStatus::Aging {
            out.push(self.proactive_rec(Proactive {
                id: "rec-content-refresh",
                title: "Schedule a content refresh",
                description: "The content is ageing. Review it before it becomes stale.",
                category: Category::Content,
                priority: Priority::Low,
                complexity: FixComplexity::Medium,
                impact: BusinessImpact::Medium,
                steps: &["Review facts and examples", "Update the page and its dateModified"],
                tools: &["Content calendar"],
                difficulty: Difficulty::Intermediate,
                hours: 4,
            }));
        }

        out
    }

    fn proactive_rec(&self, p: Proactive) -> Recommendation {
        Recommendation {
            id: p.id.to_string(),
            issue_id: None,
            source: RecommendationSource::Proactive,
            title: p.title.to_string(),
            description: p.description.to_string(),
            category: p.category,
            priority: p.priority,
            timeline: timeline_for(p.priority),
            strategic_value: strategic_value(
                self.config.recommendations.base_strategic_value,
                p.impact,
                p.complexity,
            ),
            // not tied to a severe issue
            quick_win: false,
            fix_complexity: p.complexity,
            implementation: ImplementationPlan {
                steps: p.steps.iter().map(|s| s.to_string()).collect(),
                tools: p.tools.iter().map(|t| t.to_string()).collect(),
                difficulty: p.difficulty,
                estimated_hours: p.hours,
            },
            business_impact: BusinessImpactEstimate {
                level: p.impact,
                estimated_traffic_uplift: uplift_for(p.impact).to_string(),
                summary: format!("Proactive improvement with {} business impact.", p.impact.as_str()),
            },
        }
    }

    pub fn strategy(&self, items: &[Recommendation]) -> Strategy {
        let min_value = self.config.recommendations.strategic_initiative_min_value;
        let mut strategy = Strategy::default();
        for rec in items {
            if rec.quick_win {
                strategy.quick_wins.push(rec.id.clone());
            } else if rec.strategic_value >= min_value {
                strategy.strategic_initiatives.push(rec.id.clone());
            }
            if rec.timeline == Timeline::LongTerm || rec.implementation.difficulty == Difficulty::Expert {
                strategy.long_term_goals.push(rec.id.clone());
            }
        }
        strategy
    }
}

struct Proactive {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: Category,
    priority: Priority,
    complexity: FixComplexity,
    impact: BusinessImpact,
    steps: &'static [&'static str],
    tools: &'static [&'static str],
    difficulty: Difficulty,
    hours: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::issues::build_report;
    use crate::test_utils::fixtures::{self, issue};

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(AnalysisConfig::default()))
    }

    #[test]
    fn test_strategic_value_formula() {
        assert_eq!(strategic_value(5, BusinessImpact::High, FixComplexity::Easy), 9);
        assert_eq!(strategic_value(5, BusinessImpact::Low, FixComplexity::Hard), 4);
        assert_eq!(strategic_value(9, BusinessImpact::High, FixComplexity::Easy), 10);
        assert_eq!(strategic_value(-3, BusinessImpact::Low, FixComplexity::Hard), 1);
    }

    #[test]
    fn test_priority_and_timeline_maps() {
        assert_eq!(priority_for(Severity::Critical), Priority::Immediate);
        assert_eq!(timeline_for(priority_for(Severity::High)), Timeline::ShortTerm);
        assert_eq!(timeline_for(priority_for(Severity::Medium)), Timeline::MediumTerm);
        assert_eq!(timeline_for(priority_for(Severity::Low)), Timeline::LongTerm);
    }

    #[test]
    fn test_every_issue_yields_one_recommendation() {
        let report = build_report(vec![
            issue("missing-title", Severity::Critical, FixComplexity::Easy, BusinessImpact::High),
            issue("brand-new-rule", Severity::Low, FixComplexity::Hard, BusinessImpact::Low),
        ]);
        let mut facts = fixtures::healthy_page_facts();
        facts.performance = Some(Default::default());
        let recs = engine().recommend(&facts, &ContentInsights::empty(), &report);

        let from_issues: Vec<_> = recs
            .items
            .iter()
            .filter(|r| r.source == RecommendationSource::Issue)
            .collect();
        assert_eq!(from_issues.len(), 2);
        assert_eq!(recs.items[0].id, "rec-missing-title");
        assert!(recs.items[0].quick_win);
        assert_eq!(recs.items[0].implementation.difficulty, Difficulty::Beginner);
        assert_eq!(recs.strategy.quick_wins, vec!["rec-missing-title".to_string()]);
    }

    #[test]
    fn test_quick_win_requires_easy_fix() {
        let rec = engine().from_issue(&issue("slow-lcp", Severity::High, FixComplexity::Hard, BusinessImpact::High));
        assert!(!rec.quick_win);
        assert_eq!(rec.implementation.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_sorted_by_priority_then_value() {
        let report = build_report(vec![
            issue("low-one", Severity::Low, FixComplexity::Easy, BusinessImpact::High),
            issue("medium-hard", Severity::Medium, FixComplexity::Hard, BusinessImpact::Low),
            issue("medium-easy", Severity::Medium, FixComplexity::Easy, BusinessImpact::High),
            issue("critical-one", Severity::Critical, FixComplexity::Hard, BusinessImpact::High),
        ]);
        let mut facts = fixtures::healthy_page_facts();
        facts.performance = Some(Default::default());
        let recs = engine().recommend(&facts, &ContentInsights::empty(), &report);
        let issue_recs: Vec<&str> = recs
            .items
            .iter()
            .filter(|r| r.source == RecommendationSource::Issue)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(
            issue_recs,
            vec!["rec-critical-one", "rec-medium-easy", "rec-medium-hard", "rec-low-one"]
        );
    }

    #[test]
    fn test_proactive_recommendations() {
        let mut facts = fixtures::healthy_page_facts();
        facts.performance = None;
        if let Some(c) = facts.content.known_mut() {
            c.word_count = 2400;
        }
        let mut insights = ContentInsights::empty();
        insights.freshness.status = FreshnessStatus::Aging;

        let recs = engine().proactive(&facts, &insights);
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"rec-content-hub"));
        assert!(ids.contains(&"rec-performance-monitoring"));
        assert!(ids.contains(&"rec-content-refresh"));
        assert!(recs.iter().all(|r| !r.quick_win && r.issue_id.is_none()));

        let hub = recs.iter().find(|r| r.id == "rec-content-hub").unwrap();
        let strategy = engine().strategy(std::slice::from_ref(hub));
        assert_eq!(strategy.long_term_goals, vec!["rec-content-hub".to_string()]);
    }
}
