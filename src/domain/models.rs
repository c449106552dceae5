//! Domain entities for a single page analysis run.
//!
//! Everything here is plain data: facts produced by extraction, scores,
//! issues, recommendations and the `AnalysisResult` aggregate. Ordered
//! collections are used throughout so the serialized form is stable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ====== Enums ======

/// Existence of a site-level resource (robots.txt, sitemap.xml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Present,
    Missing,
    #[default]
    NotChecked,
}

impl ResourceStatus {
    pub fn exists(&self) -> bool {
        matches!(self, ResourceStatus::Present)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ResourceStatus::Missing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Present => "present",
            ResourceStatus::Missing => "missing",
            ResourceStatus::NotChecked => "not_checked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    pub fn is_severe(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixComplexity {
    Easy,
    Medium,
    Hard,
}

impl FixComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixComplexity::Easy => "easy",
            FixComplexity::Medium => "medium",
            FixComplexity::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessImpact {
    Low,
    Medium,
    High,
}

impl BusinessImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessImpact::Low => "low",
            BusinessImpact::Medium => "medium",
            BusinessImpact::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Content,
    OnPage,
    StructuredData,
    Ux,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Content => "content",
            Category::OnPage => "on_page",
            Category::StructuredData => "structured_data",
            Category::Ux => "ux",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of what a rule detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingElement,
    InvalidValue,
    Suboptimal,
    Performance,
    CrossCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Immediate,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight, higher first.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Immediate => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timeline {
    Immediate,
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Timeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Immediate => "immediate",
            Timeline::ShortTerm => "short-term",
            Timeline::MediumTerm => "medium-term",
            Timeline::LongTerm => "long-term",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Issue,
    Proactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    CompletedWithFallback,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::CompletedWithFallback => "completed_with_fallback",
            AnalysisStatus::Failed => "failed",
        }
    }
}

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Extraction,
    Scoring,
    ContentInsights,
    IssueDetection,
    Recommendations,
    Aggregation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Extraction => "extraction",
            Phase::Scoring => "scoring",
            Phase::ContentInsights => "content_insights",
            Phase::IssueDetection => "issue_detection",
            Phase::Recommendations => "recommendations",
            Phase::Aggregation => "aggregation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ====== Pipeline input ======

/// HTTP response metadata supplied by the fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub status_code: u16,
    /// Header names are stored lowercase.
    pub headers: BTreeMap<String, String>,
    pub final_url: Option<String>,
    #[serde(default)]
    pub redirect_chain: Vec<String>,
    /// Negotiated protocol such as "HTTP/2" when the fetcher knows it.
    pub protocol: Option<String>,
}

impl ResponseMeta {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }
}

/// Everything the orchestrator needs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInput {
    pub url: String,
    pub html: String,
    pub response: ResponseMeta,
    /// True when the HTML came from a browser render rather than the plain HTTP fallback.
    pub rendered: bool,
    /// Reference instant for freshness; falls back to the response `Date` header.
    pub reference_time: Option<DateTime<Utc>>,
}

impl PageInput {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            response: ResponseMeta::ok(),
            rendered: false,
            reference_time: None,
        }
    }

    pub fn with_response(mut self, response: ResponseMeta) -> Self {
        self.response = response;
        self
    }

    pub fn rendered(mut self, rendered: bool) -> Self {
        self.rendered = rendered;
        self
    }

    pub fn with_reference_time(mut self, at: DateTime<Utc>) -> Self {
        self.reference_time = Some(at);
        self
    }
}

// ====== Extracted facts ======

/// Facts from one extraction module, or the sentinel recorded when the module failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Extracted<T> {
    Known(T),
    Unknown { reason: String },
}

impl<T> Extracted<T> {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Extracted::Unknown {
            reason: reason.into(),
        }
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Extracted::Known(facts) => Some(facts),
            Extracted::Unknown { .. } => None,
        }
    }

    pub fn known_mut(&mut self) -> Option<&mut T> {
        match self {
            Extracted::Known(facts) => Some(facts),
            Extracted::Unknown { .. } => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Extracted::Known(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HreflangLink {
    pub lang: String,
    pub href: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalFacts {
    pub has_https: bool,
    pub canonical: Option<String>,
    pub security_headers: BTreeSet<String>,
    pub missing_security_headers: BTreeSet<String>,
    pub robots_txt_status: ResourceStatus,
    pub sitemap_status: ResourceStatus,
    pub robots_meta: Option<String>,
    pub x_robots_tag: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
    pub viewport: Option<String>,
    pub responsive_viewport: bool,
    pub hreflang: Vec<HreflangLink>,
    pub status_code: u16,
    pub redirected: bool,
    pub redirect_count: usize,
    pub final_url: Option<String>,
    /// None when the fetcher did not report the protocol.
    pub http2: Option<bool>,
    pub compression: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    pub fn level(&self, level: u8) -> &[String] {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            6 => &self.h6,
            _ => &[],
        }
    }

    pub fn level_mut(&mut self, level: u8) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }

    pub fn total(&self) -> usize {
        (1..=6).map(|l| self.level(l).len()).sum()
    }

    /// All heading texts from h2 down, in level order.
    pub fn subheadings(&self) -> impl Iterator<Item = &String> {
        (2..=6).flat_map(move |l| self.level(l).iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraphTags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub og_type: Option<String>,
    pub site_name: Option<String>,
}

impl OpenGraphTags {
    /// Names of the core tags (title, description, image) that are absent.
    pub fn missing_core(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("og:title");
        }
        if self.description.is_none() {
            missing.push("og:description");
        }
        if self.image.is_none() {
            missing.push("og:image");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnPageFacts {
    pub title: Option<String>,
    pub title_length: usize,
    pub meta_description: Option<String>,
    pub meta_description_length: usize,
    pub headings: Headings,
    pub heading_hierarchy_skips: Vec<String>,
    pub images_total: usize,
    pub images_missing_alt_count: usize,
    pub images_missing_alt: Vec<String>,
    pub open_graph: OpenGraphTags,
    pub twitter_card: Option<String>,
    pub canonical: Option<String>,
    pub canonical_matches_url: Option<bool>,
    pub noindex: bool,
    pub nofollow: bool,
    pub has_favicon: bool,
    pub lang: Option<String>,
    pub internal_links: usize,
    pub external_links: usize,
    /// Cross-page comparison; None in a single-page run.
    pub duplicate_title: Option<bool>,
    pub duplicate_meta_description: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub count: usize,
    /// Percentage of all words.
    pub density: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScores {
    pub flesch_kincaid: f64,
    pub flesch_reading_ease: f64,
    pub smog: f64,
    pub ari: f64,
    pub coleman_liau: f64,
    pub gunning_fog: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFacts {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub subheading_count: usize,
    pub lexical_diversity: f64,
    pub top_keywords: Vec<KeywordFrequency>,
    pub readability: ReadabilityScores,
    pub thin_content: bool,
    pub h1_count: usize,
    pub duplicate_h1: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Spell checking is not performed.
    pub spelling_errors: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataFacts {
    pub json_ld_blocks: usize,
    pub schema_types: BTreeSet<String>,
    pub json_ld_errors: Vec<String>,
    pub rich_results_eligible: bool,
    pub rich_result_types: BTreeSet<String>,
    pub duplicate_schemas: bool,
    pub duplicate_types: BTreeSet<String>,
    pub microdata_types: BTreeSet<String>,
    pub date_published: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
}

/// Runtime metrics from the browser-automation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub lcp_ms: Option<f64>,
    pub fid_ms: Option<f64>,
    pub inp_ms: Option<f64>,
    pub cls: Option<f64>,
    pub fcp_ms: Option<f64>,
    pub ttfb_ms: Option<f64>,
    /// 0-100
    pub performance_score: Option<f64>,
    /// 0-100
    pub accessibility_score: Option<f64>,
}

impl PerformanceMetrics {
    /// Interaction latency, preferring INP over FID.
    pub fn interaction_ms(&self) -> Option<(&'static str, f64)> {
        self.inp_ms
            .map(|v| ("INP", v))
            .or_else(|| self.fid_ms.map(|v| ("FID", v)))
    }
}

/// Immutable snapshot of everything extracted for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFacts {
    pub url: String,
    pub rendered: bool,
    pub technical: Extracted<TechnicalFacts>,
    pub on_page: Extracted<OnPageFacts>,
    pub content: Extracted<ContentFacts>,
    pub structured_data: Extracted<StructuredDataFacts>,
    pub performance: Option<PerformanceMetrics>,
}

impl PageFacts {
    /// Facts used by the fallback result: every module unknown.
    pub fn unknown(url: &str, reason: &str) -> Self {
        Self {
            url: url.to_string(),
            rendered: false,
            technical: Extracted::unknown(reason),
            on_page: Extracted::unknown(reason),
            content: Extracted::unknown(reason),
            structured_data: Extracted::unknown(reason),
            performance: None,
        }
    }

    pub fn has_https(&self) -> Option<bool> {
        self.technical.known().map(|t| t.has_https)
    }

    pub fn title(&self) -> Option<&str> {
        self.on_page.known().and_then(|o| o.title.as_deref())
    }

    pub fn word_count(&self) -> Option<usize> {
        self.content.known().map(|c| c.word_count)
    }

    pub fn schema_types(&self) -> Option<&BTreeSet<String>> {
        self.structured_data.known().map(|s| &s.schema_types)
    }
}

// ====== Scores ======

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: u8,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u8,
    /// False when the underlying facts were unknown.
    pub known: bool,
    pub breakdown: BTreeMap<String, SubScore>,
}

impl CategoryScore {
    pub fn unknown() -> Self {
        Self {
            score: 0,
            known: false,
            breakdown: BTreeMap::new(),
        }
    }

    pub fn zeroed() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical: CategoryScore,
    pub content: CategoryScore,
    pub on_page: CategoryScore,
    pub structured_data: CategoryScore,
    /// Present only when runtime metrics were supplied.
    pub ux: Option<CategoryScore>,
}

impl CategoryScores {
    pub fn zeroed() -> Self {
        Self {
            technical: CategoryScore::zeroed(),
            content: CategoryScore::zeroed(),
            on_page: CategoryScore::zeroed(),
            structured_data: CategoryScore::zeroed(),
            ux: None,
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryScore> {
        match category {
            Category::Technical => Some(&self.technical),
            Category::Content => Some(&self.content),
            Category::OnPage => Some(&self.on_page),
            Category::StructuredData => Some(&self.structured_data),
            Category::Ux => self.ux.as_ref(),
        }
    }

    /// Known categories with their scores, in fixed category order.
    pub fn known(&self) -> Vec<(Category, u8)> {
        [
            Category::Technical,
            Category::Content,
            Category::OnPage,
            Category::StructuredData,
            Category::Ux,
        ]
        .into_iter()
        .filter_map(|c| self.get(c).filter(|s| s.known).map(|s| (c, s.score)))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustment {
    pub critical_issues: usize,
    pub high_issues: usize,
    pub penalty: u32,
}

// ====== Content insights ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthLevel {
    Shallow,
    Moderate,
    Comprehensive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDepth {
    pub level: DepthLevel,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingBand {
    VeryEasy,
    Easy,
    FairlyEasy,
    Standard,
    FairlyDifficult,
    Difficult,
    VeryDifficult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityAssessment {
    pub average_grade_level: f64,
    pub band: ReadingBand,
    pub audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub primary_keyword: Option<String>,
    pub density: f64,
    pub in_title: bool,
    pub in_h1: bool,
    pub in_meta_description: bool,
    pub stuffing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    Fresh,
    Aging,
    Stale,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub last_updated: Option<DateTime<Utc>>,
    pub age_days: Option<i64>,
    pub status: FreshnessStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInsights {
    pub depth: Option<ContentDepth>,
    pub readability: Option<ReadabilityAssessment>,
    pub keywords: Option<KeywordAnalysis>,
    pub freshness: Freshness,
}

impl ContentInsights {
    pub fn empty() -> Self {
        Self {
            depth: None,
            readability: None,
            keywords: None,
            freshness: Freshness {
                last_updated: None,
                age_days: None,
                status: FreshnessStatus::Unknown,
            },
        }
    }
}

// ====== Issues ======

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    pub fix_complexity: FixComplexity,
    pub business_impact: BusinessImpact,
    pub affected_elements: Vec<String>,
    /// Populated by cross-category rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_categories: Vec<Category>,
    pub implementation_steps: Vec<String>,
    pub validation_criteria: Vec<String>,
}

impl Issue {
    pub fn is_quick_win(&self) -> bool {
        self.fix_complexity == FixComplexity::Easy && self.severity.is_severe()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuesBySeverity {
    pub critical: Vec<Issue>,
    pub high: Vec<Issue>,
    pub medium: Vec<Issue>,
    pub low: Vec<Issue>,
}

impl IssuesBySeverity {
    pub fn group(&self, severity: Severity) -> &[Issue] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    /// All issues in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.critical
            .iter()
            .chain(self.high.iter())
            .chain(self.medium.iter())
            .chain(self.low.iter())
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issue ids per prioritization bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prioritization {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
    pub quick_wins: Vec<String>,
}

/// Issue ids per (impact × effort) quadrant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactMatrix {
    pub quick_wins: Vec<String>,
    pub major_projects: Vec<String>,
    pub fill_ins: Vec<String>,
    pub thankless_tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub total: usize,
    pub by_severity: IssuesBySeverity,
    pub prioritization: Prioritization,
    pub impact_matrix: ImpactMatrix,
}

// ====== Recommendations ======

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    pub steps: Vec<String>,
    pub tools: Vec<String>,
    pub difficulty: Difficulty,
    pub estimated_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessImpactEstimate {
    pub level: BusinessImpact,
    pub estimated_traffic_uplift: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub issue_id: Option<String>,
    pub source: RecommendationSource,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub timeline: Timeline,
    pub strategic_value: u8,
    pub quick_win: bool,
    pub fix_complexity: FixComplexity,
    pub implementation: ImplementationPlan,
    pub business_impact: BusinessImpactEstimate,
}

/// Recommendation ids per strategy bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub quick_wins: Vec<String>,
    pub strategic_initiatives: Vec<String>,
    pub long_term_goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub items: Vec<Recommendation>,
    pub strategy: Strategy,
}

// ====== Aggregate root ======

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: Phase,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub status: AnalysisStatus,
    pub config_version: String,
    pub facts: PageFacts,
    pub scores: CategoryScores,
    pub weighted_score: f64,
    pub risk: RiskAdjustment,
    pub overall_score: u8,
    pub insights: ContentInsights,
    pub issues: IssueReport,
    pub recommendations: RecommendationReport,
    pub confidence: u8,
    pub degraded_modules: Vec<String>,
    /// Wall-clock latencies; not part of the deterministic payload.
    pub phase_timings: Vec<PhaseTiming>,
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Structurally complete zeroed result used whenever the pipeline cannot finish.
    pub fn fallback(
        url: &str,
        status: AnalysisStatus,
        config_version: &str,
        error: impl Into<String>,
    ) -> Self {
        let error = error.into();
        Self {
            url: url.to_string(),
            status,
            config_version: config_version.to_string(),
            facts: PageFacts::unknown(url, &error),
            scores: CategoryScores::zeroed(),
            weighted_score: 0.0,
            risk: RiskAdjustment::default(),
            overall_score: 0,
            insights: ContentInsights::empty(),
            issues: IssueReport::default(),
            recommendations: RecommendationReport::default(),
            confidence: 0,
            degraded_modules: Vec::new(),
            phase_timings: Vec::new(),
            error: Some(error),
        }
    }

    pub fn issue_count(&self, severity: Severity) -> usize {
        self.issues.by_severity.group(severity).len()
    }
}
