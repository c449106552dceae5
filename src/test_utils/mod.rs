//! Shared test utilities and fixtures
//!
//! Used by unit tests, the integration tests under `tests/` and the
//! benchmarks, so the module is compiled in every profile.

pub mod fixtures {
    use std::collections::BTreeSet;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::models::*;
    use crate::extractor::technical::SECURITY_HEADERS;

    pub const PAGE_URL: &str = "https://example.com/guides/rust-seo";
    /// 45 characters.
    pub const HEALTHY_TITLE: &str = "Rust SEO Guide: Building Fast Crawlable Sites";
    pub const HEALTHY_DESCRIPTION: &str = "Learn how to build fast, crawlable Rust web services with clean markup, structured data and sensible performance budgets.";

    const SENTENCES: [&str; 10] = [
        "Rust helps teams build fast and reliable web services.",
        "Search engines reward pages that load quickly on mobile devices.",
        "Clear headings guide readers through long technical articles.",
        "Structured data describes the page so crawlers understand it.",
        "Rust compilers catch many mistakes before code reaches production.",
        "Good titles summarize the topic in a few plain words.",
        "Internal links connect related guides across the whole site.",
        "Readers stay longer when paragraphs are short and focused.",
        "Rust tooling makes profiling and benchmarking straightforward for developers.",
        "Fresh content signals that the information is still accurate.",
    ];

    const ARTICLE_JSON_LD: &str = r#"{
        "@context": "https://schema.org",
        "@graph": [
            {
                "@type": "Article",
                "headline": "Rust SEO Guide",
                "datePublished": "2024-11-01",
                "dateModified": "2025-01-15"
            },
            {
                "@type": "Organization",
                "name": "Example Guides",
                "url": "https://example.com"
            }
        ]
    }"#;

    /// Fixed "now" for freshness checks: 2025-03-01T00:00:00Z.
    pub fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    // ====== Response / metrics ======

    /// 200 over HTTP/2 with every security header and gzip.
    pub fn secure_response() -> ResponseMeta {
        let mut response = ResponseMeta::ok()
            .with_header("content-type", "text/html; charset=utf-8")
            .with_header("content-encoding", "gzip")
            .with_header("date", "Sat, 01 Mar 2025 00:00:00 GMT");
        for header in SECURITY_HEADERS {
            response = response.with_header(header, "set");
        }
        response.final_url = Some(PAGE_URL.to_string());
        response.protocol = Some("HTTP/2".to_string());
        response
    }

    /// Metrics inside every "good" threshold.
    pub fn good_metrics() -> PerformanceMetrics {
        PerformanceMetrics {
            lcp_ms: Some(1800.0),
            fid_ms: None,
            inp_ms: Some(120.0),
            cls: Some(0.02),
            fcp_ms: Some(900.0),
            ttfb_ms: Some(200.0),
            performance_score: Some(94.0),
            accessibility_score: Some(97.0),
        }
    }

    // ====== HTML ======

    /// Roughly `words` words of body copy split into paragraphs, with an h2 every third paragraph.
    pub fn body_copy(words: usize) -> String {
        let mut html = String::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut written = 0;
        let mut paragraphs = 0;

        for sentence in SENTENCES.iter().cycle() {
            if written >= words {
                break;
            }
            written += sentence.split_whitespace().count();
            paragraph.push(sentence);
            if paragraph.len() == 8 {
                paragraphs += 1;
                if paragraphs % 3 == 0 {
                    html.push_str(&format!("<h2>Part {}</h2>\n", paragraphs / 3));
                }
                html.push_str(&format!("<p>{}</p>\n", paragraph.join(" ")));
                paragraph.clear();
            }
        }
        if !paragraph.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", paragraph.join(" ")));
        }
        html
    }

    /// A complete page; `None` title omits the tag, `None` JSON-LD omits the block.
    pub fn page_html(title: Option<&str>, words: usize, json_ld: Option<&str>) -> String {
        let title_tag = title
            .map(|t| format!("<title>{}</title>", t))
            .unwrap_or_default();
        let json_ld_tag = json_ld
            .map(|j| format!(r#"<script type="application/ld+json">{}</script>"#, j))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  {title_tag}
  <meta name="description" content="{HEALTHY_DESCRIPTION}">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="canonical" href="{PAGE_URL}">
  <link rel="icon" href="/favicon.ico">
  <meta property="og:title" content="Rust SEO Guide">
  <meta property="og:description" content="Fast, crawlable Rust sites.">
  <meta property="og:image" content="https://example.com/og.png">
  <meta property="og:type" content="article">
  <meta name="twitter:card" content="summary_large_image">
  <meta property="article:published_time" content="2024-11-01T09:00:00Z">
  <meta property="article:modified_time" content="2025-01-15T09:00:00Z">
  {json_ld_tag}
</head>
<body>
  <nav><a href="/">Home</a> <a href="/guides/">Guides</a> <a href="https://www.rust-lang.org/">Rust</a></nav>
  <h1>Rust SEO Guide</h1>
  <img src="/img/diagram.png" alt="Request flow diagram">
  {body}
  <footer><a href="/about">About</a></footer>
</body>
</html>"#,
            body = body_copy(words),
        )
    }

    /// HTTPS page with a 45-character title, 1200 words and one Article JSON-LD graph.
    pub fn healthy_page_html() -> String {
        page_html(Some(HEALTHY_TITLE), 1200, Some(ARTICLE_JSON_LD))
    }

    pub fn article_json_ld() -> &'static str {
        ARTICLE_JSON_LD
    }

    // ====== Facts ======

    pub fn healthy_technical_facts() -> TechnicalFacts {
        TechnicalFacts {
            has_https: true,
            canonical: Some(PAGE_URL.to_string()),
            security_headers: SECURITY_HEADERS.iter().map(|h| h.to_string()).collect(),
            missing_security_headers: BTreeSet::new(),
            robots_txt_status: ResourceStatus::Present,
            sitemap_status: ResourceStatus::Present,
            robots_meta: Some("index, follow".into()),
            x_robots_tag: None,
            noindex: false,
            nofollow: false,
            viewport: Some("width=device-width, initial-scale=1".into()),
            responsive_viewport: true,
            hreflang: Vec::new(),
            status_code: 200,
            redirected: false,
            redirect_count: 0,
            final_url: Some(PAGE_URL.to_string()),
            http2: Some(true),
            compression: Some("gzip".into()),
        }
    }

    pub fn healthy_on_page_facts() -> OnPageFacts {
        OnPageFacts {
            title: Some(HEALTHY_TITLE.to_string()),
            title_length: HEALTHY_TITLE.chars().count(),
            meta_description: Some(HEALTHY_DESCRIPTION.to_string()),
            meta_description_length: HEALTHY_DESCRIPTION.chars().count(),
            headings: Headings {
                h1: vec!["Rust SEO Guide".into()],
                h2: vec![
                    "Why speed matters".into(),
                    "Structured data".into(),
                    "Internal linking".into(),
                    "Keeping content fresh".into(),
                ],
                ..Default::default()
            },
            heading_hierarchy_skips: Vec::new(),
            images_total: 3,
            images_missing_alt_count: 0,
            images_missing_alt: Vec::new(),
            open_graph: OpenGraphTags {
                title: Some("Rust SEO Guide".into()),
                description: Some("Fast, crawlable Rust sites.".into()),
                image: Some("https://example.com/og.png".into()),
                url: Some(PAGE_URL.to_string()),
                og_type: Some("article".into()),
                site_name: Some("Example Guides".into()),
            },
            twitter_card: Some("summary_large_image".into()),
            canonical: Some(PAGE_URL.to_string()),
            canonical_matches_url: Some(true),
            noindex: false,
            nofollow: false,
            has_favicon: true,
            lang: Some("en".into()),
            internal_links: 8,
            external_links: 2,
            duplicate_title: None,
            duplicate_meta_description: None,
        }
    }

    pub fn healthy_content_facts() -> ContentFacts {
        ContentFacts {
            word_count: 1200,
            paragraph_count: 14,
            sentence_count: 80,
            avg_words_per_sentence: 15.0,
            subheading_count: 4,
            lexical_diversity: 0.46,
            top_keywords: vec![
                KeywordFrequency {
                    keyword: "rust".into(),
                    count: 18,
                    density: 1.5,
                },
                KeywordFrequency {
                    keyword: "crawlable".into(),
                    count: 9,
                    density: 0.75,
                },
            ],
            readability: ReadabilityScores {
                flesch_kincaid: 8.2,
                flesch_reading_ease: 62.0,
                smog: 9.1,
                ari: 8.4,
                coleman_liau: 9.6,
                gunning_fog: 10.3,
            },
            thin_content: false,
            h1_count: 1,
            duplicate_h1: false,
            published_at: Some(date(2024, 11, 1)),
            modified_at: Some(date(2025, 1, 15)),
            spelling_errors: None,
        }
    }

    pub fn healthy_structured_data_facts() -> StructuredDataFacts {
        StructuredDataFacts {
            json_ld_blocks: 1,
            schema_types: ["Article".to_string(), "Organization".to_string()].into(),
            json_ld_errors: Vec::new(),
            rich_results_eligible: true,
            rich_result_types: ["Article".to_string()].into(),
            duplicate_schemas: false,
            duplicate_types: BTreeSet::new(),
            microdata_types: BTreeSet::new(),
            date_published: Some(date(2024, 11, 1)),
            date_modified: Some(date(2025, 1, 15)),
        }
    }

    /// Every module known, no runtime metrics.
    pub fn healthy_page_facts() -> PageFacts {
        PageFacts {
            url: PAGE_URL.to_string(),
            rendered: true,
            technical: Extracted::Known(healthy_technical_facts()),
            on_page: Extracted::Known(healthy_on_page_facts()),
            content: Extracted::Known(healthy_content_facts()),
            structured_data: Extracted::Known(healthy_structured_data_facts()),
            performance: None,
        }
    }

    /// Insecure page with no title and 50 words of text.
    pub fn thin_page_facts() -> PageFacts {
        let mut facts = healthy_page_facts();
        if let Some(t) = facts.technical.known_mut() {
            t.has_https = false;
            t.security_headers.clear();
            t.missing_security_headers = SECURITY_HEADERS.iter().map(|h| h.to_string()).collect();
        }
        if let Some(o) = facts.on_page.known_mut() {
            o.title = None;
            o.title_length = 0;
        }
        if let Some(c) = facts.content.known_mut() {
            c.word_count = 50;
            c.paragraph_count = 1;
            c.sentence_count = 5;
            c.avg_words_per_sentence = 10.0;
            c.subheading_count = 0;
            c.thin_content = true;
        }
        facts.structured_data = Extracted::Known(StructuredDataFacts::default());
        facts
    }

    // ====== Issues ======

    pub fn issue(id: &str, severity: Severity, fix_complexity: FixComplexity, business_impact: BusinessImpact) -> Issue {
        Issue {
            id: id.to_string(),
            kind: IssueKind::Suboptimal,
            title: format!("Test issue {}", id),
            description: format!("{} was detected.", id),
            severity,
            category: Category::OnPage,
            fix_complexity,
            business_impact,
            affected_elements: Vec::new(),
            affected_categories: Vec::new(),
            implementation_steps: vec!["Fix it".to_string()],
            validation_criteria: vec!["It is fixed".to_string()],
        }
    }
}

/// Helper assertions for tests
pub mod assertions {
    use crate::domain::models::{AnalysisResult, Issue, Severity};

    /// Finds an issue by id anywhere in the severity groups
    pub fn find_issue<'a>(result: &'a AnalysisResult, id: &str) -> Option<&'a Issue> {
        result.issues.by_severity.iter().find(|i| i.id == id)
    }

    pub fn has_issue(result: &AnalysisResult, id: &str) -> bool {
        find_issue(result, id).is_some()
    }

    /// Severity of the issue with this id, if it was detected
    pub fn severity_of(result: &AnalysisResult, id: &str) -> Option<Severity> {
        find_issue(result, id).map(|i| i.severity)
    }

    /// Result with wall-clock timings removed, for determinism checks
    pub fn without_timings(mut result: AnalysisResult) -> AnalysisResult {
        result.phase_timings.clear();
        result
    }
}
