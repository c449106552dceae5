//! Content facts from visible body text: counts, keywords, readability,
//! duplicate H1s and publication dates.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use scraper::{Html, Selector};
use url::Url;

use super::readability::{readability_scores, text_stats, tokenize};
use super::{element_text, meta_content, selector, visible_text, FactExtractor};
use crate::config::Thresholds;
use crate::domain::models::{ContentFacts, KeywordFrequency, ResponseMeta};
use crate::error::Result;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn is_stopword(word: &str) -> bool {
    static SET: OnceLock<BTreeSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
        .contains(word)
}

pub struct ContentExtractor {
    pub keyword_limit: usize,
    pub min_keyword_chars: usize,
    pub thin_content_words: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self {
            keyword_limit: 5,
            min_keyword_chars: 3,
            thin_content_words: 100,
        }
    }
}

impl ContentExtractor {
    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            thin_content_words: thresholds.thin_content_words,
            ..Default::default()
        }
    }
}

impl FactExtractor for ContentExtractor {
    type Facts = ContentFacts;

    fn name(&self) -> &'static str {
        "content"
    }

    fn extract(&self, document: &Html, response: &ResponseMeta, _page_url: &Url) -> Result<ContentFacts> {
        let text = visible_text(document);
        let words = tokenize(&text);
        let stats = text_stats(&text);

        let unique: BTreeSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let lexical_diversity = if words.is_empty() {
            0.0
        } else {
            round2(unique.len() as f64 / words.len() as f64)
        };

        let h1s = Self::h1_texts(document);
        let distinct_h1: BTreeSet<String> = h1s.iter().map(|h| h.to_lowercase()).collect();

        let (published_at, modified_at) = Self::dates(document, response);

        let facts = ContentFacts {
            word_count: words.len(),
            paragraph_count: Self::paragraph_count(document),
            sentence_count: stats.sentences,
            avg_words_per_sentence: round2(stats.words_per_sentence()),
            subheading_count: Self::subheading_count(document),
            lexical_diversity,
            top_keywords: self.top_keywords(&words),
            readability: readability_scores(&stats),
            thin_content: words.len() < self.thin_content_words,
            h1_count: h1s.len(),
            duplicate_h1: distinct_h1.len() < h1s.len(),
            published_at,
            modified_at,
            spelling_errors: None,
        };

        tracing::debug!(
            "[EXTRACT] content: words={} sentences={} reading_ease={}",
            facts.word_count,
            facts.sentence_count,
            facts.readability.flesch_reading_ease
        );

        Ok(facts)
    }
}

impl ContentExtractor {
    /// Most frequent non-stopwords; ties keep the word seen first.
    pub fn top_keywords(&self, words: &[&str]) -> Vec<KeywordFrequency> {
        if words.is_empty() {
            return Vec::new();
        }

        // word -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, word) in words.iter().enumerate() {
            let lower = word.to_lowercase();
            if lower.chars().count() < self.min_keyword_chars
                || is_stopword(&lower)
                || lower.chars().all(|c| c.is_numeric())
            {
                continue;
            }
            counts.entry(lower).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(word, (count, first))| (word, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let total = words.len() as f64;
        ranked
            .into_iter()
            .take(self.keyword_limit)
            .map(|(keyword, count, _)| KeywordFrequency {
                keyword,
                count,
                density: round2(count as f64 / total * 100.0),
            })
            .collect()
    }

    fn h1_texts(document: &Html) -> Vec<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("h1"));
        document
            .select(selector)
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn paragraph_count(document: &Html) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("body p"));
        document
            .select(selector)
            .filter(|el| !element_text(el).is_empty())
            .count()
    }

    fn subheading_count(document: &Html) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("h2, h3, h4, h5, h6"));
        document
            .select(selector)
            .filter(|el| !element_text(el).is_empty())
            .count()
    }

    fn dates(document: &Html, response: &ResponseMeta) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        static PUBLISHED: OnceLock<Selector> = OnceLock::new();
        static MODIFIED: OnceLock<Selector> = OnceLock::new();
        static TIME: OnceLock<Selector> = OnceLock::new();
        let published_sel = PUBLISHED.get_or_init(|| selector("meta[property='article:published_time']"));
        let modified_sel = MODIFIED.get_or_init(|| {
            selector("meta[property='article:modified_time'], meta[property='og:updated_time']")
        });
        let time_sel = TIME.get_or_init(|| selector("time[datetime]"));

        let published = meta_content(document, published_sel)
            .and_then(|raw| parse_date(&raw))
            .or_else(|| {
                document
                    .select(time_sel)
                    .filter_map(|el| el.value().attr("datetime"))
                    .find_map(parse_date)
            });

        let modified = meta_content(document, modified_sel)
            .and_then(|raw| parse_date(&raw))
            .or_else(|| response.header("last-modified").and_then(parse_date));

        (published, modified)
    }
}

/// Parse the date formats found in page metadata and HTTP headers:
/// RFC 3339, RFC 2822 (HTTP dates), and bare `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
