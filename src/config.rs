//! Versioned tuning tables for every pipeline phase.
//!
//! Scoring penalties, category weights, detection thresholds, confidence
//! penalties and pipeline timeouts live here so each phase is a pure function
//! of `(facts, config)`. Every section implements `Default` with the
//! production values and deserializes with `#[serde(default)]`, so a config
//! file only needs the keys it overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::models::Category;
use crate::error::AnalysisError;

/// Bumped whenever a default value below changes.
pub const CONFIG_VERSION: &str = "2025.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub version: String,
    pub scoring: ScoringConfig,
    pub thresholds: Thresholds,
    pub recommendations: RecommendationConfig,
    pub confidence: ConfidenceConfig,
    pub pipeline: PipelineConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            scoring: ScoringConfig::default(),
            thresholds: Thresholds::default(),
            recommendations: RecommendationConfig::default(),
            confidence: ConfidenceConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("Failed to parse analysis config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Rejects values that would make a phase misbehave.
    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        self.scoring.weights.validate()?;
        let t = &self.thresholds;
        if t.title_min_chars > t.title_max_chars {
            return Err(AnalysisError::config("title_min_chars exceeds title_max_chars"));
        }
        if t.meta_description_min_chars > t.meta_description_max_chars {
            return Err(AnalysisError::config(
                "meta_description_min_chars exceeds meta_description_max_chars",
            ));
        }
        if t.aging_after_days > t.stale_after_days {
            return Err(AnalysisError::config("aging_after_days exceeds stale_after_days"));
        }
        if self.pipeline.run_timeout_ms == 0 {
            return Err(AnalysisError::config("run_timeout_ms must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// SCORING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub technical: f64,
    pub content: f64,
    pub on_page: f64,
    pub structured_data: f64,
    pub ux: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            technical: 0.30,
            content: 0.25,
            on_page: 0.25,
            structured_data: 0.15,
            ux: 0.05,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Technical => self.technical,
            Category::Content => self.content,
            Category::OnPage => self.on_page,
            Category::StructuredData => self.structured_data,
            Category::Ux => self.ux,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        let all = [
            self.technical,
            self.content,
            self.on_page,
            self.structured_data,
            self.ux,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AnalysisError::config("category weights must be finite and non-negative"));
        }
        if all.iter().sum::<f64>() <= 0.0 {
            return Err(AnalysisError::config("category weights sum to zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub per_critical: u32,
    pub per_high: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            per_critical: 10,
            per_high: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalPenalties {
    pub no_https: u32,
    pub noindex: u32,
    pub http_error: u32,
    pub missing_viewport: u32,
    pub non_responsive_viewport: u32,
    pub missing_canonical: u32,
    pub per_missing_security_header: u32,
    pub security_headers_cap: u32,
    pub robots_txt_missing: u32,
    pub sitemap_missing: u32,
    pub redirected: u32,
    pub invalid_hreflang: u32,
}

impl Default for TechnicalPenalties {
    fn default() -> Self {
        Self {
            no_https: 20,
            noindex: 20,
            http_error: 15,
            missing_viewport: 15,
            non_responsive_viewport: 7,
            missing_canonical: 10,
            per_missing_security_header: 2,
            security_headers_cap: 10,
            robots_txt_missing: 5,
            sitemap_missing: 3,
            redirected: 5,
            invalid_hreflang: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPenalties {
    pub thin_content: u32,
    pub low_word_count: u32,
    pub very_poor_readability: u32,
    pub poor_readability: u32,
    pub few_paragraphs: u32,
    pub long_sentences: u32,
    pub no_keywords: u32,
    pub duplicate_h1: u32,
    pub low_lexical_diversity: u32,
    pub no_subheadings: u32,
}

impl Default for ContentPenalties {
    fn default() -> Self {
        Self {
            thin_content: 20,
            low_word_count: 10,
            very_poor_readability: 15,
            poor_readability: 8,
            few_paragraphs: 10,
            long_sentences: 10,
            no_keywords: 10,
            duplicate_h1: 10,
            low_lexical_diversity: 10,
            no_subheadings: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnPagePenalties {
    pub missing_title: u32,
    pub title_length: u32,
    pub missing_meta_description: u32,
    pub meta_description_length: u32,
    pub missing_h1: u32,
    pub multiple_h1: u32,
    pub heading_skips: u32,
    pub per_missing_alt: u32,
    pub missing_alt_cap: u32,
    pub per_missing_open_graph: u32,
    pub canonical_mismatch: u32,
    pub missing_lang: u32,
    pub missing_favicon: u32,
    pub no_internal_links: u32,
}

impl Default for OnPagePenalties {
    fn default() -> Self {
        Self {
            missing_title: 20,
            title_length: 10,
            missing_meta_description: 15,
            meta_description_length: 7,
            missing_h1: 15,
            multiple_h1: 8,
            heading_skips: 5,
            per_missing_alt: 2,
            missing_alt_cap: 10,
            per_missing_open_graph: 2,
            canonical_mismatch: 5,
            missing_lang: 5,
            missing_favicon: 3,
            no_internal_links: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredDataPenalties {
    pub no_json_ld: u32,
    pub per_parse_error: u32,
    pub parse_error_cap: u32,
    pub not_rich_result_eligible: u32,
    pub duplicate_schemas: u32,
    pub no_identity_schema: u32,
}

impl Default for StructuredDataPenalties {
    fn default() -> Self {
        Self {
            no_json_ld: 20,
            per_parse_error: 10,
            parse_error_cap: 30,
            not_rich_result_eligible: 15,
            duplicate_schemas: 10,
            no_identity_schema: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UxPenalties {
    pub lcp_poor: u32,
    pub lcp_needs_improvement: u32,
    pub interaction_poor: u32,
    pub interaction_needs_improvement: u32,
    pub cls_poor: u32,
    pub cls_needs_improvement: u32,
    pub fcp_poor: u32,
    pub fcp_needs_improvement: u32,
    pub ttfb_poor: u32,
    pub ttfb_needs_improvement: u32,
    pub accessibility_poor: u32,
    pub accessibility_needs_improvement: u32,
    pub performance_score_poor: u32,
}

impl Default for UxPenalties {
    fn default() -> Self {
        Self {
            lcp_poor: 25,
            lcp_needs_improvement: 12,
            interaction_poor: 15,
            interaction_needs_improvement: 7,
            cls_poor: 20,
            cls_needs_improvement: 10,
            fcp_poor: 10,
            fcp_needs_improvement: 5,
            ttfb_poor: 10,
            ttfb_needs_improvement: 5,
            accessibility_poor: 20,
            accessibility_needs_improvement: 10,
            performance_score_poor: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    pub risk: RiskConfig,
    pub technical: TechnicalPenalties,
    pub content: ContentPenalties,
    pub on_page: OnPagePenalties,
    pub structured_data: StructuredDataPenalties,
    pub ux: UxPenalties,
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Boundaries shared by scoring, insights and issue detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub meta_description_min_chars: usize,
    pub meta_description_max_chars: usize,
    pub thin_content_words: usize,
    pub low_word_count: usize,
    pub min_paragraphs: usize,
    pub reading_ease_very_poor: f64,
    pub reading_ease_poor: f64,
    pub long_sentence_words: f64,
    pub min_lexical_diversity: f64,
    pub min_keyword_density: f64,
    pub keyword_stuffing_density: f64,
    pub aging_after_days: i64,
    pub stale_after_days: i64,
    pub lcp_good_ms: f64,
    pub lcp_poor_ms: f64,
    pub fid_good_ms: f64,
    pub fid_poor_ms: f64,
    pub inp_good_ms: f64,
    pub inp_poor_ms: f64,
    pub cls_good: f64,
    pub cls_poor: f64,
    pub fcp_good_ms: f64,
    pub fcp_poor_ms: f64,
    pub ttfb_good_ms: f64,
    pub ttfb_poor_ms: f64,
    pub performance_score_critical: f64,
    pub performance_score_poor: f64,
    pub accessibility_poor: f64,
    pub accessibility_good: f64,
    pub min_missing_security_headers: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min_chars: 30,
            title_max_chars: 60,
            meta_description_min_chars: 70,
            meta_description_max_chars: 160,
            thin_content_words: 100,
            low_word_count: 300,
            min_paragraphs: 3,
            reading_ease_very_poor: 30.0,
            reading_ease_poor: 50.0,
            long_sentence_words: 25.0,
            min_lexical_diversity: 0.3,
            min_keyword_density: 0.5,
            keyword_stuffing_density: 3.0,
            aging_after_days: 180,
            stale_after_days: 365,
            lcp_good_ms: 2500.0,
            lcp_poor_ms: 4000.0,
            fid_good_ms: 100.0,
            fid_poor_ms: 300.0,
            inp_good_ms: 200.0,
            inp_poor_ms: 500.0,
            cls_good: 0.1,
            cls_poor: 0.25,
            fcp_good_ms: 1800.0,
            fcp_poor_ms: 3000.0,
            ttfb_good_ms: 800.0,
            ttfb_poor_ms: 1800.0,
            performance_score_critical: 30.0,
            performance_score_poor: 50.0,
            accessibility_poor: 50.0,
            accessibility_good: 90.0,
            min_missing_security_headers: 3,
        }
    }
}

impl Thresholds {
    /// Poor threshold for the interaction metric named by `PerformanceMetrics::interaction_ms`.
    pub fn interaction_limits(&self, metric: &str) -> (f64, f64) {
        if metric == "INP" {
            (self.inp_good_ms, self.inp_poor_ms)
        } else {
            (self.fid_good_ms, self.fid_poor_ms)
        }
    }
}

// ============================================================================
// RECOMMENDATIONS / CONFIDENCE / PIPELINE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub base_strategic_value: i32,
    pub content_hub_min_words: usize,
    pub strategic_initiative_min_value: u8,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            base_strategic_value: 5,
            content_hub_min_words: 1500,
            strategic_initiative_min_value: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub no_metrics: u8,
    pub not_rendered: u8,
    pub degraded: u8,
    pub few_issues: u8,
    pub few_issues_threshold: usize,
    pub floor_when_healthy: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            no_metrics: 15,
            not_rendered: 10,
            degraded: 25,
            few_issues: 10,
            few_issues_threshold: 5,
            floor_when_healthy: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub run_timeout_ms: u64,
    pub collaborator_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            run_timeout_ms: 30_000,
            collaborator_timeout_ms: 10_000,
        }
    }
}
