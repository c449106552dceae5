//! Content insights: depth, readability assessment, keyword analysis and
//! freshness. Runs after scoring and feeds issue detection.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AnalysisConfig;
use crate::domain::models::{
    ContentDepth, ContentFacts, ContentInsights, DepthLevel, Freshness, FreshnessStatus,
    KeywordAnalysis, OnPageFacts, PageFacts, ReadabilityAssessment, ReadingBand,
};

pub struct ContentInsightsAnalyzer {
    config: Arc<AnalysisConfig>,
}

impl ContentInsightsAnalyzer {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// `reference_time` anchors freshness; without it the age stays unknown.
    pub fn analyze(&self, facts: &PageFacts, reference_time: Option<DateTime<Utc>>) -> ContentInsights {
        let content = facts.content.known();
        let on_page = facts.on_page.known();

        let insights = ContentInsights {
            depth: content.map(content_depth),
            readability: content.and_then(readability_assessment),
            keywords: content.and_then(|c| self.keyword_analysis(c, on_page)),
            freshness: self.freshness(facts, reference_time),
        };

        tracing::debug!(
            "[INSIGHTS] depth={:?} freshness={:?}",
            insights.depth.as_ref().map(|d| d.level),
            insights.freshness.status
        );

        insights
    }

    fn keyword_analysis(&self, content: &ContentFacts, on_page: Option<&OnPageFacts>) -> Option<KeywordAnalysis> {
        let top = content.top_keywords.first()?;
        let keyword = top.keyword.to_lowercase();
        let contains = |text: Option<&str>| {
            text.map(|t| t.to_lowercase().contains(&keyword))
                .unwrap_or(false)
        };

        Some(KeywordAnalysis {
            primary_keyword: Some(top.keyword.clone()),
            density: top.density,
            in_title: contains(on_page.and_then(|o| o.title.as_deref())),
            in_h1: on_page
                .map(|o| o.headings.h1.iter().any(|h| contains(Some(h.as_str()))))
                .unwrap_or(false),
            in_meta_description: contains(on_page.and_then(|o| o.meta_description.as_deref())),
            stuffing: top.density > self.config.thresholds.keyword_stuffing_density,
        })
    }

    fn freshness(&self, facts: &PageFacts, reference_time: Option<DateTime<Utc>>) -> Freshness {
        let content = facts.content.known();
        let schema = facts.structured_data.known();

        let last_updated = [
            content.and_then(|c| c.modified_at),
            content.and_then(|c| c.published_at),
            schema.and_then(|s| s.date_modified),
            schema.and_then(|s| s.date_published),
        ]
        .into_iter()
        .flatten()
        .max();

        let age_days = match (last_updated, reference_time) {
            (Some(updated), Some(now)) => Some((now - updated).num_days().max(0)),
            _ => None,
        };

        let th = &self.config.thresholds;
        let status = match age_days {
            None => FreshnessStatus::Unknown,
            Some(age) if age > th.stale_after_days => FreshnessStatus::Stale,
            Some(age) if age > th.aging_after_days => FreshnessStatus::Aging,
            Some(_) => FreshnessStatus::Fresh,
        };

        Freshness {
            last_updated,
            age_days,
            status,
        }
    }
}

/// Depth score: up to 60 points for length, 20 for subheadings, 20 for paragraphs.
pub fn content_depth(content: &ContentFacts) -> ContentDepth {
    let length = (content.word_count as f64 / 1500.0 * 60.0).min(60.0);
    let structure = (content.subheading_count as f64 * 5.0).min(20.0);
    let paragraphs = (content.paragraph_count as f64 * 2.0).min(20.0);
    let score = (length + structure + paragraphs).round().clamp(0.0, 100.0) as u8;

    let level = match score {
        0..=39 => DepthLevel::Shallow,
        40..=69 => DepthLevel::Moderate,
        _ => DepthLevel::Comprehensive,
    };
    ContentDepth { level, score }
}

pub fn readability_assessment(content: &ContentFacts) -> Option<ReadabilityAssessment> {
    if content.word_count == 0 {
        return None;
    }
    let r = &content.readability;
    let grades = [r.flesch_kincaid, r.smog, r.ari, r.coleman_liau, r.gunning_fog];
    let average = grades.iter().sum::<f64>() / grades.len() as f64;
    let band = reading_band(r.flesch_reading_ease);

    Some(ReadabilityAssessment {
        average_grade_level: (average * 10.0).round() / 10.0,
        band,
        audience: audience(band).to_string(),
    })
}

pub fn reading_band(reading_ease: f64) -> ReadingBand {
    match reading_ease {
        e if e >= 90.0 => ReadingBand::VeryEasy,
        e if e >= 80.0 => ReadingBand::Easy,
        e if e >= 70.0 => ReadingBand::FairlyEasy,
        e if e >= 60.0 => ReadingBand::Standard,
        e if e >= 50.0 => ReadingBand::FairlyDifficult,
        e if e >= 30.0 => ReadingBand::Difficult,
        _ => ReadingBand::VeryDifficult,
    }
}

fn audience(band: ReadingBand) -> &'static str {
    match band {
        ReadingBand::VeryEasy => "5th grade",
        ReadingBand::Easy => "6th grade",
        ReadingBand::FairlyEasy => "7th grade",
        ReadingBand::Standard => "8th-9th grade",
        ReadingBand::FairlyDifficult => "10th-12th grade",
        ReadingBand::Difficult => "college",
        ReadingBand::VeryDifficult => "college graduate",
    }
}
