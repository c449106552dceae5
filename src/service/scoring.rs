//! Category scoring, weighted overall score and risk adjustment.
//!
//! Every category starts at 100 and loses fixed penalties taken from
//! `ScoringConfig`. Penalties are grouped into named subfactors so the
//! breakdown explains where points went. Everything here is a pure function
//! of `(facts, issue counts, config)`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::domain::models::{
    CategoryScore, CategoryScores, ContentFacts, OnPageFacts, PageFacts,
    PerformanceMetrics, Phase, RiskAdjustment, StructuredDataFacts, SubScore, TechnicalFacts,
};
use crate::error::{AnalysisError, Result};

/// Schema types that identify who publishes the page.
pub const IDENTITY_SCHEMA_TYPES: [&str; 5] =
    ["Organization", "Person", "WebSite", "LocalBusiness", "Corporation"];

// ====== Penalty sheet ======

/// Collects `(subfactor, max penalty, applied penalty)` entries for one category.
#[derive(Debug, Default)]
struct PenaltySheet {
    entries: Vec<(&'static str, u32, u32)>,
}

impl PenaltySheet {
    fn factor(&mut self, name: &'static str, max: u32, applied: u32) -> &mut Self {
        self.entries.push((name, max, applied.min(max)));
        self
    }

    fn finish(&self) -> CategoryScore {
        let total_max: u32 = self.entries.iter().map(|(_, max, _)| *max).sum();
        let total_applied: u32 = self.entries.iter().map(|(_, _, applied)| *applied).sum();

        let breakdown: BTreeMap<String, SubScore> = self
            .entries
            .iter()
            .filter(|(_, max, _)| *max > 0)
            .map(|(name, max, applied)| {
                let retained = ((max - applied) as f64 / *max as f64 * 100.0).round() as u8;
                let weight = if total_max == 0 {
                    0.0
                } else {
                    round4(*max as f64 / total_max as f64)
                };
                (name.to_string(), SubScore { score: retained, weight })
            })
            .collect();

        CategoryScore {
            score: 100u32.saturating_sub(total_applied) as u8,
            known: true,
            breakdown,
        }
    }
}

fn when(condition: bool, penalty: u32) -> u32 {
    if condition {
        penalty
    } else {
        0
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ====== Engine ======

pub struct ScoringEngine {
    config: Arc<AnalysisConfig>,
}

impl ScoringEngine {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Score every category; unknown facts give `known: false` and score 0.
    pub fn score_categories(&self, facts: &PageFacts) -> CategoryScores {
        let scores = CategoryScores {
            technical: facts
                .technical
                .known()
                .map(|t| self.technical(t))
                .unwrap_or_else(CategoryScore::unknown),
            content: facts
                .content
                .known()
                .map(|c| self.content(c))
                .unwrap_or_else(CategoryScore::unknown),
            on_page: facts
                .on_page
                .known()
                .map(|o| self.on_page(o))
                .unwrap_or_else(CategoryScore::unknown),
            structured_data: facts
                .structured_data
                .known()
                .map(|s| self.structured_data(s))
                .unwrap_or_else(CategoryScore::unknown),
            ux: facts.performance.as_ref().map(|m| self.ux(m)),
        };

        tracing::debug!(
            "[SCORING] technical={} content={} on_page={} structured_data={} ux={:?}",
            scores.technical.score,
            scores.content.score,
            scores.on_page.score,
            scores.structured_data.score,
            scores.ux.as_ref().map(|u| u.score)
        );

        scores
    }

    /// Weighted mean over known categories, renormalized by their weights.
    pub fn weighted_score(&self, scores: &CategoryScores) -> Result<f64> {
        let weights = &self.config.scoring.weights;
        weights
            .validate()
            .map_err(|e| AnalysisError::phase(Phase::Scoring, e.to_string()))?;

        let known = scores.known();
        let total_weight: f64 = known.iter().map(|(c, _)| weights.weight(*c)).sum();
        if known.is_empty() || total_weight <= 0.0 {
            return Err(AnalysisError::phase(
                Phase::Scoring,
                "no known category carries a positive weight",
            ));
        }

        let sum: f64 = known
            .iter()
            .map(|(c, score)| weights.weight(*c) * *score as f64)
            .sum();
        Ok((sum / total_weight * 100.0).round() / 100.0)
    }

    /// Subtract per-issue risk penalties from the weighted score.
    pub fn risk_adjust(&self, weighted: f64, critical: usize, high: usize) -> (RiskAdjustment, u8) {
        let risk = &self.config.scoring.risk;
        let penalty = critical as u32 * risk.per_critical + high as u32 * risk.per_high;
        let overall = (weighted.round() - penalty as f64).clamp(0.0, 100.0) as u8;
        (
            RiskAdjustment {
                critical_issues: critical,
                high_issues: high,
                penalty,
            },
            overall,
        )
    }

    // ====== Categories ======

    pub fn technical(&self, t: &TechnicalFacts) -> CategoryScore {
        let p = &self.config.scoring.technical;
        let missing_headers = t.missing_security_headers.len() as u32;
        let viewport_penalty = match (&t.viewport, t.responsive_viewport) {
            (None, _) => p.missing_viewport,
            (Some(_), false) => p.non_responsive_viewport,
            (Some(_), true) => 0,
        };

        PenaltySheet::default()
            .factor("https", p.no_https, when(!t.has_https, p.no_https))
            .factor("indexability", p.noindex, when(t.noindex, p.noindex))
            .factor("status", p.http_error, when(t.status_code >= 400, p.http_error))
            .factor("viewport", p.missing_viewport, viewport_penalty)
            .factor("canonical", p.missing_canonical, when(t.canonical.is_none(), p.missing_canonical))
            .factor(
                "security_headers",
                p.security_headers_cap,
                missing_headers * p.per_missing_security_header,
            )
            .factor(
                "robots_txt",
                p.robots_txt_missing,
                when(t.robots_txt_status.is_missing(), p.robots_txt_missing),
            )
            .factor("sitemap", p.sitemap_missing, when(t.sitemap_status.is_missing(), p.sitemap_missing))
            .factor("redirects", p.redirected, when(t.redirected, p.redirected))
            .factor(
                "hreflang",
                p.invalid_hreflang,
                when(t.hreflang.iter().any(|h| !h.valid), p.invalid_hreflang),
            )
            .finish()
    }

    pub fn content(&self, c: &ContentFacts) -> CategoryScore {
        let p = &self.config.scoring.content;
        let th = &self.config.thresholds;

        let word_penalty = if c.thin_content {
            p.thin_content
        } else if c.word_count < th.low_word_count {
            p.low_word_count
        } else {
            0
        };
        let has_text = c.word_count > 0;
        let reading_ease = c.readability.flesch_reading_ease;
        let readability_penalty = if !has_text {
            0
        } else if reading_ease < th.reading_ease_very_poor {
            p.very_poor_readability
        } else if reading_ease < th.reading_ease_poor {
            p.poor_readability
        } else {
            0
        };

        PenaltySheet::default()
            .factor("word_count", p.thin_content, word_penalty)
            .factor("readability", p.very_poor_readability, readability_penalty)
            .factor(
                "paragraphs",
                p.few_paragraphs,
                when(c.paragraph_count < th.min_paragraphs, p.few_paragraphs),
            )
            .factor(
                "sentence_length",
                p.long_sentences,
                when(c.avg_words_per_sentence > th.long_sentence_words, p.long_sentences),
            )
            .factor("keywords", p.no_keywords, when(c.top_keywords.is_empty(), p.no_keywords))
            .factor("h1", p.duplicate_h1, when(c.duplicate_h1, p.duplicate_h1))
            .factor(
                "lexical_diversity",
                p.low_lexical_diversity,
                when(
                    has_text && c.lexical_diversity < th.min_lexical_diversity,
                    p.low_lexical_diversity,
                ),
            )
            .factor(
                "structure",
                p.no_subheadings,
                when(c.subheading_count == 0, p.no_subheadings),
            )
            .finish()
    }

    pub fn on_page(&self, o: &OnPageFacts) -> CategoryScore {
        let p = &self.config.scoring.on_page;
        let th = &self.config.thresholds;

        let title_penalty = match &o.title {
            None => p.missing_title,
            Some(_) if o.title_length < th.title_min_chars || o.title_length > th.title_max_chars => {
                p.title_length
            }
            Some(_) => 0,
        };
        let meta_penalty = match &o.meta_description {
            None => p.missing_meta_description,
            Some(_)
                if o.meta_description_length < th.meta_description_min_chars
                    || o.meta_description_length > th.meta_description_max_chars =>
            {
                p.meta_description_length
            }
            Some(_) => 0,
        };
        let h1_penalty = match o.headings.h1.len() {
            0 => p.missing_h1,
            1 => 0,
            _ => p.multiple_h1,
        };
        let missing_og = o.open_graph.missing_core().len() as u32;

        PenaltySheet::default()
            .factor("title", p.missing_title, title_penalty)
            .factor("meta_description", p.missing_meta_description, meta_penalty)
            .factor("h1", p.missing_h1, h1_penalty)
            .factor(
                "heading_hierarchy",
                p.heading_skips,
                when(!o.heading_hierarchy_skips.is_empty(), p.heading_skips),
            )
            .factor(
                "image_alt",
                p.missing_alt_cap,
                o.images_missing_alt_count as u32 * p.per_missing_alt,
            )
            .factor("open_graph", p.per_missing_open_graph * 3, missing_og * p.per_missing_open_graph)
            .factor(
                "canonical",
                p.canonical_mismatch,
                when(o.canonical_matches_url == Some(false), p.canonical_mismatch),
            )
            .factor("lang", p.missing_lang, when(o.lang.is_none(), p.missing_lang))
            .factor("favicon", p.missing_favicon, when(!o.has_favicon, p.missing_favicon))
            .factor(
                "internal_links",
                p.no_internal_links,
                when(o.internal_links == 0, p.no_internal_links),
            )
            .finish()
    }

    pub fn structured_data(&self, s: &StructuredDataFacts) -> CategoryScore {
        let p = &self.config.scoring.structured_data;
        let has_identity = s
            .schema_types
            .iter()
            .any(|t| IDENTITY_SCHEMA_TYPES.contains(&t.as_str()));

        PenaltySheet::default()
            .factor("json_ld", p.no_json_ld, when(s.json_ld_blocks == 0, p.no_json_ld))
            .factor(
                "parse_errors",
                p.parse_error_cap,
                s.json_ld_errors.len() as u32 * p.per_parse_error,
            )
            .factor(
                "rich_results",
                p.not_rich_result_eligible,
                when(!s.rich_results_eligible, p.not_rich_result_eligible),
            )
            .factor("duplicates", p.duplicate_schemas, when(s.duplicate_schemas, p.duplicate_schemas))
            .factor("identity", p.no_identity_schema, when(!has_identity, p.no_identity_schema))
            .finish()
    }

    /// Only called when metrics exist; absent individual metrics cost nothing.
    pub fn ux(&self, m: &PerformanceMetrics) -> CategoryScore {
        let p = &self.config.scoring.ux;
        let th = &self.config.thresholds;

        let graded = |value: Option<f64>, good: f64, poor: f64, poor_penalty: u32, ni_penalty: u32| {
            match value {
                Some(v) if v > poor => poor_penalty,
                Some(v) if v > good => ni_penalty,
                _ => 0,
            }
        };

        let interaction_penalty = m
            .interaction_ms()
            .map(|(metric, value)| {
                let (good, poor) = th.interaction_limits(metric);
                graded(Some(value), good, poor, p.interaction_poor, p.interaction_needs_improvement)
            })
            .unwrap_or(0);
        let accessibility_penalty = match m.accessibility_score {
            Some(a) if a < th.accessibility_poor => p.accessibility_poor,
            Some(a) if a < th.accessibility_good => p.accessibility_needs_improvement,
            _ => 0,
        };

        PenaltySheet::default()
            .factor(
                "lcp",
                p.lcp_poor,
                graded(m.lcp_ms, th.lcp_good_ms, th.lcp_poor_ms, p.lcp_poor, p.lcp_needs_improvement),
            )
            .factor("interaction", p.interaction_poor, interaction_penalty)
            .factor(
                "cls",
                p.cls_poor,
                graded(m.cls, th.cls_good, th.cls_poor, p.cls_poor, p.cls_needs_improvement),
            )
            .factor(
                "fcp",
                p.fcp_poor,
                graded(m.fcp_ms, th.fcp_good_ms, th.fcp_poor_ms, p.fcp_poor, p.fcp_needs_improvement),
            )
            .factor(
                "ttfb",
                p.ttfb_poor,
                graded(m.ttfb_ms, th.ttfb_good_ms, th.ttfb_poor_ms, p.ttfb_poor, p.ttfb_needs_improvement),
            )
            .factor("accessibility", p.accessibility_poor, accessibility_penalty)
            .factor(
                "performance_score",
                p.performance_score_poor,
                when(
                    m.performance_score.map(|s| s < th.performance_score_poor).unwrap_or(false),
                    p.performance_score_poor,
                ),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Extracted, Headings};
    use crate::test_utils::fixtures;
    use pretty_assertions::assert_eq;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(Arc::new(AnalysisConfig::default()))
    }

    #[test]
    fn test_missing_https_costs_twenty() {
        let mut facts = fixtures::healthy_technical_facts();
        let baseline = engine().technical(&facts).score;
        facts.has_https = false;
        let score = engine().technical(&facts);
        assert_eq!(baseline - score.score, 20);
        assert_eq!(score.breakdown["https"].score, 0);
    }

    #[test]
    fn test_missing_title_costs_twenty() {
        let mut facts = fixtures::healthy_on_page_facts();
        let baseline = engine().on_page(&facts).score;
        facts.title = None;
        facts.title_length = 0;
        assert_eq!(baseline - engine().on_page(&facts).score, 20);
    }

    #[test]
    fn test_thin_content_costs_twenty() {
        let mut facts = fixtures::healthy_content_facts();
        let baseline = engine().content(&facts).score;
        facts.word_count = 50;
        facts.thin_content = true;
        assert_eq!(baseline - engine().content(&facts).score, 20);
    }

    #[test]
    fn test_no_json_ld_costs_twenty() {
        let facts = StructuredDataFacts {
            json_ld_blocks: 1,
            rich_results_eligible: true,
            schema_types: ["Article".to_string(), "Organization".to_string()].into(),
            ..Default::default()
        };
        let baseline = engine().structured_data(&facts).score;
        assert_eq!(baseline, 100);

        let empty = StructuredDataFacts::default();
        let score = engine().structured_data(&empty);
        // no JSON-LD, not eligible, no identity schema
        assert_eq!(score.score, 100 - 20 - 15 - 5);
    }

    #[test]
    fn test_breakdown_weights_sum_to_one() {
        let score = engine().on_page(&OnPageFacts::default());
        let total: f64 = score.breakdown.values().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 0.001, "weights summed to {total}");
        assert!(score.breakdown.values().all(|s| s.score <= 100));
    }

    #[test]
    fn test_scores_clamp_at_zero() {
        let facts = OnPageFacts {
            images_missing_alt_count: 500,
            headings: Headings::default(),
            ..Default::default()
        };
        let score = engine().on_page(&facts);
        assert!(score.score <= 100);
        assert_eq!(score.breakdown["image_alt"].score, 0);
    }

    #[test]
    fn test_unknown_module_is_excluded_from_weighting() {
        let mut facts = fixtures::healthy_page_facts();
        facts.structured_data = Extracted::unknown("boom");
        let scores = engine().score_categories(&facts);

        assert!(!scores.structured_data.known);
        assert_eq!(scores.structured_data.score, 0);

        let weighted = engine().weighted_score(&scores).unwrap();
        let expected = (0.30 * scores.technical.score as f64
            + 0.25 * scores.content.score as f64
            + 0.25 * scores.on_page.score as f64)
            / 0.80;
        assert!((weighted - expected).abs() < 0.01);
    }

    #[test]
    fn test_ux_only_with_metrics() {
        let mut facts = fixtures::healthy_page_facts();
        facts.performance = None;
        assert!(engine().score_categories(&facts).ux.is_none());

        facts.performance = Some(PerformanceMetrics {
            lcp_ms: Some(5000.0),
            cls: Some(0.15),
            ..Default::default()
        });
        let ux = engine().score_categories(&facts).ux.unwrap();
        assert_eq!(ux.score, 100 - 25 - 10);
    }

    #[test]
    fn test_zero_weight_over_known_categories_fails() {
        let mut config = AnalysisConfig::default();
        config.scoring.weights.technical = 0.0;
        config.scoring.weights.content = 0.0;
        config.scoring.weights.on_page = 0.0;
        config.scoring.weights.structured_data = 0.0;
        config.scoring.weights.ux = 1.0;
        let engine = ScoringEngine::new(Arc::new(config));

        let mut facts = fixtures::healthy_page_facts();
        facts.performance = None;
        let scores = engine.score_categories(&facts);
        let err = engine.weighted_score(&scores).unwrap_err();
        assert!(err.to_string().contains("scoring"));
    }

    #[test]
    fn test_risk_adjustment() {
        let (risk, overall) = engine().risk_adjust(82.4, 1, 2);
        assert_eq!(risk.penalty, 20);
        assert_eq!(overall, 62);

        let (_, overall) = engine().risk_adjust(15.0, 3, 0);
        assert_eq!(overall, 0);
    }
}
