//! Static issue rule table.
//!
//! Each rule is a predicate over a `RuleContext`. A rule reads its module's
//! facts through the context accessors, which return `None` for unknown
//! modules, so rules for a degraded module never fire.

use crate::config::Thresholds;
use crate::domain::models::{
    BusinessImpact, Category, CategoryScores, ContentFacts, ContentInsights, FixComplexity,
    FreshnessStatus, IssueKind, OnPageFacts, PageFacts, PerformanceMetrics, Severity,
    StructuredDataFacts, TechnicalFacts,
};

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub facts: &'a PageFacts,
    pub scores: &'a CategoryScores,
    pub insights: &'a ContentInsights,
    pub thresholds: &'a Thresholds,
}

impl<'a> RuleContext<'a> {
    pub fn technical(&self) -> Option<&'a TechnicalFacts> {
        self.facts.technical.known()
    }

    pub fn on_page(&self) -> Option<&'a OnPageFacts> {
        self.facts.on_page.known()
    }

    pub fn content(&self) -> Option<&'a ContentFacts> {
        self.facts.content.known()
    }

    pub fn structured_data(&self) -> Option<&'a StructuredDataFacts> {
        self.facts.structured_data.known()
    }

    pub fn metrics(&self) -> Option<&'a PerformanceMetrics> {
        self.facts.performance.as_ref()
    }
}

/// What a matched rule reports beyond its static metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Finding {
    pub description: String,
    pub affected_elements: Vec<String>,
}

fn found(description: impl Into<String>) -> Option<Finding> {
    Some(Finding {
        description: description.into(),
        affected_elements: Vec::new(),
    })
}

fn found_with(description: impl Into<String>, affected_elements: Vec<String>) -> Option<Finding> {
    Some(Finding {
        description: description.into(),
        affected_elements,
    })
}

pub struct Rule {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: IssueKind,
    pub category: Category,
    pub severity: Severity,
    pub fix_complexity: FixComplexity,
    pub business_impact: BusinessImpact,
    /// Non-empty only for cross-category rules.
    pub affected_categories: &'static [Category],
    pub steps: &'static [&'static str],
    pub validation: &'static [&'static str],
    pub check: fn(&RuleContext<'_>) -> Option<Finding>,
}

// ============================================================================
// SINGLE-CATEGORY RULES
// ============================================================================

pub static RULES: &[Rule] = &[
    // ====== Technical ======
    Rule {
        id: "no-ssl",
        title: "Page is not served over HTTPS",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &[
            "Install a TLS certificate for the domain",
            "Redirect every HTTP URL to its HTTPS equivalent with a 301",
            "Update internal links and canonical tags to HTTPS",
        ],
        validation: &["The final URL uses the https scheme", "HTTP requests answer with a 301 to HTTPS"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.has_https {
                return None;
            }
            found("The page resolves to an insecure http:// URL. Browsers flag it and search engines prefer secure pages.")
        },
    },
    Rule {
        id: "noindex-directive",
        title: "Page is blocked from indexing",
        kind: IssueKind::InvalidValue,
        category: Category::Technical,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &[
            "Remove noindex from the robots meta tag",
            "Remove noindex from the X-Robots-Tag response header",
        ],
        validation: &["Neither the robots meta tag nor X-Robots-Tag contains noindex"],
        check: |ctx| {
            let t = ctx.technical()?;
            if !t.noindex {
                return None;
            }
            let sources: Vec<String> = [t.robots_meta.as_ref(), t.x_robots_tag.as_ref()]
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            found_with("A noindex directive keeps this page out of search results.", sources)
        },
    },
    Rule {
        id: "http-error-status",
        title: "Page returns an HTTP error status",
        kind: IssueKind::InvalidValue,
        category: Category::Technical,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &[
            "Find why the server answers with an error",
            "Restore the page or redirect it to its replacement",
        ],
        validation: &["The page answers with a 2xx status"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.status_code < 400 {
                return None;
            }
            found(format!("The server answered with status {}.", t.status_code))
        },
    },
    Rule {
        id: "missing-viewport",
        title: "Missing viewport meta tag",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"> to <head>"],
        validation: &["The viewport meta tag is present and uses width=device-width"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.viewport.is_some() {
                return None;
            }
            found("Without a viewport tag mobile browsers render the desktop layout scaled down.")
        },
    },
    Rule {
        id: "non-responsive-viewport",
        title: "Viewport is not responsive",
        kind: IssueKind::InvalidValue,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Set the viewport content to width=device-width, initial-scale=1"],
        validation: &["The viewport meta tag contains width=device-width"],
        check: |ctx| {
            let t = ctx.technical()?;
            let viewport = t.viewport.as_ref()?;
            if t.responsive_viewport {
                return None;
            }
            found_with(
                "The viewport does not adapt to the device width.",
                vec![viewport.clone()],
            )
        },
    },
    Rule {
        id: "missing-canonical",
        title: "Missing canonical URL",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Add <link rel=\"canonical\" href=\"...\"> pointing at the preferred URL"],
        validation: &["Exactly one canonical link is present"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.canonical.is_some() {
                return None;
            }
            found("No canonical link tells search engines which URL variant to index.")
        },
    },
    Rule {
        id: "missing-security-headers",
        title: "Security headers missing",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &[
            "Configure the web server or CDN to send the missing headers",
            "Start Content-Security-Policy in report-only mode before enforcing it",
        ],
        validation: &["Response headers include HSTS, CSP and X-Content-Type-Options"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.missing_security_headers.len() < ctx.thresholds.min_missing_security_headers {
                return None;
            }
            found_with(
                format!("{} recommended security headers are missing.", t.missing_security_headers.len()),
                t.missing_security_headers.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "missing-robots-txt",
        title: "robots.txt not found",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Publish /robots.txt with crawl rules and a Sitemap: line"],
        validation: &["/robots.txt answers with 200"],
        check: |ctx| {
            let t = ctx.technical()?;
            if !t.robots_txt_status.is_missing() {
                return None;
            }
            found("The site has no robots.txt to guide crawlers.")
        },
    },
    Rule {
        id: "missing-sitemap",
        title: "XML sitemap not found",
        kind: IssueKind::MissingElement,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Generate /sitemap.xml", "Reference it from robots.txt and submit it to search consoles"],
        validation: &["/sitemap.xml answers with 200 and lists this page"],
        check: |ctx| {
            let t = ctx.technical()?;
            if !t.sitemap_status.is_missing() {
                return None;
            }
            found("No XML sitemap helps crawlers discover the site's pages.")
        },
    },
    Rule {
        id: "invalid-hreflang",
        title: "Invalid hreflang annotations",
        kind: IssueKind::InvalidValue,
        category: Category::Technical,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Use ISO 639-1 language codes with optional ISO 3166 regions", "Give every alternate an absolute href"],
        validation: &["Every hreflang value is a valid language code or x-default"],
        check: |ctx| {
            let t = ctx.technical()?;
            let invalid: Vec<String> = t
                .hreflang
                .iter()
                .filter(|h| !h.valid)
                .map(|h| h.lang.clone())
                .collect();
            if invalid.is_empty() {
                return None;
            }
            found_with(format!("{} hreflang annotations are invalid.", invalid.len()), invalid)
        },
    },
    Rule {
        id: "redirected-url",
        title: "URL redirects before serving content",
        kind: IssueKind::Suboptimal,
        category: Category::Technical,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Link directly to the final URL", "Collapse redirect chains into a single hop"],
        validation: &["The requested URL answers without a redirect"],
        check: |ctx| {
            let t = ctx.technical()?;
            if !t.redirected {
                return None;
            }
            let elements = t.final_url.iter().cloned().collect();
            found_with(format!("The page went through {} redirect(s).", t.redirect_count), elements)
        },
    },
    Rule {
        id: "no-compression",
        title: "Response is not compressed",
        kind: IssueKind::Performance,
        category: Category::Technical,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Enable gzip or brotli compression for HTML responses"],
        validation: &["The response carries a Content-Encoding header"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.compression.is_some() || t.status_code >= 300 {
                return None;
            }
            found("The HTML is served without gzip or brotli compression.")
        },
    },
    Rule {
        id: "no-http2",
        title: "HTTP/2 not negotiated",
        kind: IssueKind::Performance,
        category: Category::Technical,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Enable HTTP/2 on the server or CDN"],
        validation: &["The response protocol is HTTP/2 or newer"],
        check: |ctx| {
            let t = ctx.technical()?;
            if t.http2 != Some(false) {
                return None;
            }
            found("The page was served over HTTP/1.x.")
        },
    },
    // ====== On-page ======
    Rule {
        id: "missing-title",
        title: "Missing title tag",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Add a unique <title> of 30-60 characters describing the page"],
        validation: &["Exactly one non-empty <title> is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.title.is_some() {
                return None;
            }
            found("The page has no title, which is the headline shown in search results.")
        },
    },
    Rule {
        id: "title-too-short",
        title: "Title is too short",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Expand the title with the primary keyword and a benefit"],
        validation: &["The title is between the configured minimum and maximum length"],
        check: |ctx| {
            let o = ctx.on_page()?;
            let title = o.title.as_ref()?;
            if o.title_length >= ctx.thresholds.title_min_chars {
                return None;
            }
            found_with(
                format!("The title has {} characters; aim for at least {}.", o.title_length, ctx.thresholds.title_min_chars),
                vec![title.clone()],
            )
        },
    },
    Rule {
        id: "title-too-long",
        title: "Title is too long",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Shorten the title so the key phrase fits before truncation"],
        validation: &["The title is at most the configured maximum length"],
        check: |ctx| {
            let o = ctx.on_page()?;
            let title = o.title.as_ref()?;
            if o.title_length <= ctx.thresholds.title_max_chars {
                return None;
            }
            found_with(
                format!("The title has {} characters and will be truncated after {}.", o.title_length, ctx.thresholds.title_max_chars),
                vec![title.clone()],
            )
        },
    },
    Rule {
        id: "missing-meta-description",
        title: "Missing meta description",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Write a 70-160 character summary in <meta name=\"description\">"],
        validation: &["A non-empty meta description is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.meta_description.is_some() {
                return None;
            }
            found("Search engines will pick an arbitrary snippet for this page.")
        },
    },
    Rule {
        id: "meta-description-length",
        title: "Meta description length out of range",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Rewrite the description to fit the recommended length"],
        validation: &["The meta description length is within the configured range"],
        check: |ctx| {
            let o = ctx.on_page()?;
            o.meta_description.as_ref()?;
            let th = ctx.thresholds;
            let len = o.meta_description_length;
            if (th.meta_description_min_chars..=th.meta_description_max_chars).contains(&len) {
                return None;
            }
            found(format!(
                "The meta description has {} characters; aim for {}-{}.",
                len, th.meta_description_min_chars, th.meta_description_max_chars
            ))
        },
    },
    Rule {
        id: "missing-h1",
        title: "Missing H1 heading",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Add one <h1> that states the page topic"],
        validation: &["Exactly one non-empty <h1> is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if !o.headings.h1.is_empty() {
                return None;
            }
            found("The page has no main heading.")
        },
    },
    Rule {
        id: "multiple-h1",
        title: "Multiple H1 headings",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Keep one <h1> and demote the others to <h2>"],
        validation: &["Exactly one <h1> is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.headings.h1.len() <= 1 {
                return None;
            }
            found_with(
                format!("The page has {} H1 headings.", o.headings.h1.len()),
                o.headings.h1.clone(),
            )
        },
    },
    Rule {
        id: "heading-hierarchy-skip",
        title: "Heading levels are skipped",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Nest headings one level at a time (h2 under h1, h3 under h2)"],
        validation: &["No heading jumps more than one level deeper than its predecessor"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.heading_hierarchy_skips.is_empty() {
                return None;
            }
            found_with("The heading outline skips levels.", o.heading_hierarchy_skips.clone())
        },
    },
    Rule {
        id: "images-missing-alt",
        title: "Images without alt text",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Describe each informative image in its alt attribute", "Use alt=\"\" for purely decorative images"],
        validation: &["Every <img> has an alt attribute"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.images_missing_alt_count == 0 {
                return None;
            }
            found_with(
                format!("{} of {} images have no alt attribute.", o.images_missing_alt_count, o.images_total),
                o.images_missing_alt.clone(),
            )
        },
    },
    Rule {
        id: "missing-open-graph",
        title: "Incomplete Open Graph tags",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Add og:title, og:description and og:image meta tags"],
        validation: &["All core Open Graph tags are present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            let missing = o.open_graph.missing_core();
            if missing.is_empty() {
                return None;
            }
            found_with(
                "Shared links will render without a rich preview.",
                missing.into_iter().map(str::to_string).collect(),
            )
        },
    },
    Rule {
        id: "missing-twitter-card",
        title: "Missing Twitter card",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Add <meta name=\"twitter:card\" content=\"summary_large_image\">"],
        validation: &["A twitter:card meta tag is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.twitter_card.is_some() {
                return None;
            }
            found("No twitter:card tag controls how the page looks when shared.")
        },
    },
    Rule {
        id: "canonical-mismatch",
        title: "Canonical points to a different URL",
        kind: IssueKind::InvalidValue,
        category: Category::OnPage,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Point the canonical at this page unless it is an intentional duplicate"],
        validation: &["The canonical URL matches the page URL"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.canonical_matches_url != Some(false) {
                return None;
            }
            found_with(
                "The canonical tag asks search engines to index another URL instead.",
                o.canonical.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "missing-lang",
        title: "Missing document language",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Set <html lang=\"..\"> to the content language"],
        validation: &["The html element has a lang attribute"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.lang.is_some() {
                return None;
            }
            found("The html element declares no language.")
        },
    },
    Rule {
        id: "missing-favicon",
        title: "Missing favicon",
        kind: IssueKind::MissingElement,
        category: Category::OnPage,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Add <link rel=\"icon\" href=\"/favicon.ico\">"],
        validation: &["A link with rel containing icon is present"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.has_favicon {
                return None;
            }
            found("No favicon is declared; search results and tabs show a generic icon.")
        },
    },
    Rule {
        id: "no-internal-links",
        title: "No internal links",
        kind: IssueKind::Suboptimal,
        category: Category::OnPage,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Link to related pages on the same site with descriptive anchor text"],
        validation: &["The page links to at least one internal page"],
        check: |ctx| {
            let o = ctx.on_page()?;
            if o.internal_links > 0 {
                return None;
            }
            found("The page is a dead end for crawlers and readers.")
        },
    },
    // ====== Content ======
    Rule {
        id: "thin-content",
        title: "Thin content",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::High,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &[
            "Research what searchers need from this page",
            "Expand the copy with original, substantive information",
        ],
        validation: &["Visible word count is above the thin-content threshold"],
        check: |ctx| {
            let c = ctx.content()?;
            if !c.thin_content {
                return None;
            }
            found(format!("The page has only {} words of visible text.", c.word_count))
        },
    },
    Rule {
        id: "low-word-count",
        title: "Low word count",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Cover the topic in more depth with examples and answers to common questions"],
        validation: &["Visible word count meets the configured minimum"],
        check: |ctx| {
            let c = ctx.content()?;
            if c.thin_content || c.word_count >= ctx.thresholds.low_word_count {
                return None;
            }
            found(format!(
                "The page has {} words; comparable pages usually have at least {}.",
                c.word_count, ctx.thresholds.low_word_count
            ))
        },
    },
    Rule {
        id: "poor-readability",
        title: "Text is hard to read",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Use shorter sentences and plainer words", "Break long paragraphs up with lists"],
        validation: &["Flesch reading ease is above the configured floor"],
        check: |ctx| {
            let c = ctx.content()?;
            let ease = c.readability.flesch_reading_ease;
            if c.word_count == 0 || ease >= ctx.thresholds.reading_ease_poor {
                return None;
            }
            found(format!("Flesch reading ease is {:.1}.", ease))
        },
    },
    Rule {
        id: "long-sentences",
        title: "Sentences are long",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Split sentences that carry more than one idea"],
        validation: &["Average sentence length is below the configured limit"],
        check: |ctx| {
            let c = ctx.content()?;
            if c.avg_words_per_sentence <= ctx.thresholds.long_sentence_words {
                return None;
            }
            found(format!("Sentences average {:.1} words.", c.avg_words_per_sentence))
        },
    },
    Rule {
        id: "few-paragraphs",
        title: "Too few paragraphs",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Structure the copy into short paragraphs of one idea each"],
        validation: &["The page has at least the configured number of paragraphs"],
        check: |ctx| {
            let c = ctx.content()?;
            if c.paragraph_count >= ctx.thresholds.min_paragraphs {
                return None;
            }
            found(format!("The page has {} paragraph(s).", c.paragraph_count))
        },
    },
    Rule {
        id: "no-subheadings",
        title: "No subheadings",
        kind: IssueKind::MissingElement,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Break the copy into sections with descriptive <h2>/<h3> headings"],
        validation: &["At least one subheading is present"],
        check: |ctx| {
            let c = ctx.content()?;
            if c.subheading_count > 0 {
                return None;
            }
            found("The text has no subheadings to scan or to anchor featured snippets.")
        },
    },
    Rule {
        id: "duplicate-h1",
        title: "Repeated H1 text",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Remove the repeated heading or give each section its own wording"],
        validation: &["Every H1 text is distinct"],
        check: |ctx| {
            let c = ctx.content()?;
            if !c.duplicate_h1 {
                return None;
            }
            found("The same H1 text appears more than once.")
        },
    },
    Rule {
        id: "low-lexical-diversity",
        title: "Repetitive wording",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Low,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Vary the vocabulary and cover related subtopics"],
        validation: &["Lexical diversity is above the configured minimum"],
        check: |ctx| {
            let c = ctx.content()?;
            if c.word_count == 0 || c.lexical_diversity >= ctx.thresholds.min_lexical_diversity {
                return None;
            }
            found(format!("Only {:.0}% of the words are distinct.", c.lexical_diversity * 100.0))
        },
    },
    Rule {
        id: "keyword-stuffing",
        title: "Keyword stuffing",
        kind: IssueKind::InvalidValue,
        category: Category::Content,
        severity: Severity::High,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Reduce repetitions of the primary keyword", "Use synonyms and natural phrasing"],
        validation: &["Primary keyword density is below the stuffing threshold"],
        check: |ctx| {
            ctx.content()?;
            let k = ctx.insights.keywords.as_ref()?;
            if !k.stuffing {
                return None;
            }
            found_with(
                format!("The primary keyword makes up {:.2}% of the text.", k.density),
                k.primary_keyword.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "keyword-not-in-title",
        title: "Primary keyword missing from title",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Work the page's main topic phrase into the title"],
        validation: &["The title contains the primary keyword"],
        check: |ctx| {
            ctx.content()?;
            let o = ctx.on_page()?;
            o.title.as_ref()?;
            let k = ctx.insights.keywords.as_ref()?;
            if k.in_title || k.density < ctx.thresholds.min_keyword_density {
                return None;
            }
            found_with(
                "The most frequent topic word does not appear in the title.",
                k.primary_keyword.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "stale-content",
        title: "Content is stale",
        kind: IssueKind::Suboptimal,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Review the page for outdated facts", "Update it and its dateModified"],
        validation: &["The last update is within the configured freshness window"],
        check: |ctx| {
            ctx.content()?;
            let f = &ctx.insights.freshness;
            if f.status != FreshnessStatus::Stale {
                return None;
            }
            found(format!("The content was last updated {} days ago.", f.age_days.unwrap_or_default()))
        },
    },
    // ====== Structured data ======
    Rule {
        id: "missing-structured-data",
        title: "No structured data",
        kind: IssueKind::MissingElement,
        category: Category::StructuredData,
        severity: Severity::High,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Add a JSON-LD block describing the page (Article, Product, ...)"],
        validation: &["At least one JSON-LD block parses and declares an @type"],
        check: |ctx| {
            let s = ctx.structured_data()?;
            if s.json_ld_blocks > 0 || !s.microdata_types.is_empty() {
                return None;
            }
            found("The page has no JSON-LD or microdata for search engines to read.")
        },
    },
    Rule {
        id: "invalid-json-ld",
        title: "Malformed JSON-LD",
        kind: IssueKind::InvalidValue,
        category: Category::StructuredData,
        severity: Severity::High,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Fix the JSON syntax in the reported blocks", "Validate with a structured data testing tool"],
        validation: &["Every JSON-LD block parses"],
        check: |ctx| {
            let s = ctx.structured_data()?;
            if s.json_ld_errors.is_empty() {
                return None;
            }
            found_with(
                format!("{} JSON-LD block(s) failed to parse.", s.json_ld_errors.len()),
                s.json_ld_errors.clone(),
            )
        },
    },
    Rule {
        id: "no-rich-result-schema",
        title: "No rich-result eligible schema",
        kind: IssueKind::Suboptimal,
        category: Category::StructuredData,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Add BreadcrumbList, Article, Product or FAQPage markup where it fits"],
        validation: &["At least one rich-result eligible type is declared"],
        check: |ctx| {
            let s = ctx.structured_data()?;
            if s.json_ld_blocks == 0 || s.rich_results_eligible {
                return None;
            }
            found_with(
                "Structured data is present but none of it qualifies for rich results.",
                s.schema_types.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "duplicate-schema",
        title: "Duplicate schema types",
        kind: IssueKind::Suboptimal,
        category: Category::StructuredData,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::Low,
        affected_categories: &[],
        steps: &["Merge duplicate entities into one block per type"],
        validation: &["Each schema type is declared once"],
        check: |ctx| {
            let s = ctx.structured_data()?;
            if !s.duplicate_schemas {
                return None;
            }
            found_with(
                "The same schema type is declared more than once.",
                s.duplicate_types.iter().cloned().collect(),
            )
        },
    },
    // ====== UX / performance ======
    Rule {
        id: "poor-performance-score",
        title: "Very poor performance score",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &[
            "Profile the page load and remove render-blocking resources",
            "Compress and lazy-load images",
            "Reduce JavaScript execution time",
        ],
        validation: &["The performance score is above the critical threshold"],
        check: |ctx| {
            let score = ctx.metrics()?.performance_score?;
            if score >= ctx.thresholds.performance_score_critical {
                return None;
            }
            found(format!("The performance score is {:.0}/100.", score))
        },
    },
    Rule {
        id: "low-performance-score",
        title: "Low performance score",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::High,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Audit the largest resources and third-party scripts", "Defer non-critical work"],
        validation: &["The performance score is above the poor threshold"],
        check: |ctx| {
            let score = ctx.metrics()?.performance_score?;
            let th = ctx.thresholds;
            if score < th.performance_score_critical || score >= th.performance_score_poor {
                return None;
            }
            found(format!("The performance score is {:.0}/100.", score))
        },
    },
    Rule {
        id: "slow-lcp",
        title: "Slow Largest Contentful Paint",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::High,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::High,
        affected_categories: &[],
        steps: &["Preload the hero image or font", "Serve the LCP resource from a CDN"],
        validation: &["LCP is below the good threshold"],
        check: |ctx| {
            let lcp = ctx.metrics()?.lcp_ms?;
            if lcp <= ctx.thresholds.lcp_poor_ms {
                return None;
            }
            found(format!("LCP is {:.0} ms.", lcp))
        },
    },
    Rule {
        id: "slow-interaction",
        title: "Slow interaction response",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::High,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Break up long tasks on the main thread", "Move heavy work off input handlers"],
        validation: &["INP (or FID) is below the poor threshold"],
        check: |ctx| {
            let (metric, value) = ctx.metrics()?.interaction_ms()?;
            let (_, poor) = ctx.thresholds.interaction_limits(metric);
            if value <= poor {
                return None;
            }
            found(format!("{} is {:.0} ms.", metric, value))
        },
    },
    Rule {
        id: "layout-shift",
        title: "High cumulative layout shift",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Reserve space for images, ads and embeds with explicit dimensions"],
        validation: &["CLS is below the poor threshold"],
        check: |ctx| {
            let cls = ctx.metrics()?.cls?;
            if cls <= ctx.thresholds.cls_poor {
                return None;
            }
            found(format!("CLS is {:.2}.", cls))
        },
    },
    Rule {
        id: "slow-server-response",
        title: "Slow server response",
        kind: IssueKind::Performance,
        category: Category::Ux,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Hard,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Cache rendered HTML", "Move the origin closer to users or add a CDN"],
        validation: &["TTFB is below the poor threshold"],
        check: |ctx| {
            let ttfb = ctx.metrics()?.ttfb_ms?;
            if ttfb <= ctx.thresholds.ttfb_poor_ms {
                return None;
            }
            found(format!("TTFB is {:.0} ms.", ttfb))
        },
    },
    Rule {
        id: "accessibility-issues",
        title: "Low accessibility score",
        kind: IssueKind::Suboptimal,
        category: Category::Ux,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[],
        steps: &["Fix contrast, labels and landmark issues reported by the audit"],
        validation: &["The accessibility score is above the poor threshold"],
        check: |ctx| {
            let score = ctx.metrics()?.accessibility_score?;
            if score >= ctx.thresholds.accessibility_poor {
                return None;
            }
            found(format!("The accessibility score is {:.0}/100.", score))
        },
    },
];

// ============================================================================
// CROSS-CATEGORY RULES
// ============================================================================

pub static CROSS_CATEGORY_RULES: &[Rule] = &[
    Rule {
        id: "mobile-experience-gap",
        title: "Poor mobile experience",
        kind: IssueKind::CrossCategory,
        category: Category::Technical,
        severity: Severity::High,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::High,
        affected_categories: &[Category::Technical, Category::Ux],
        steps: &[
            "Make the layout responsive with a device-width viewport",
            "Optimize the largest above-the-fold element for mobile",
        ],
        validation: &["The viewport is responsive and LCP is within the good threshold"],
        check: |ctx| {
            let t = ctx.technical()?;
            let lcp = ctx.metrics()?.lcp_ms?;
            if t.responsive_viewport || lcp <= ctx.thresholds.lcp_good_ms {
                return None;
            }
            found(format!(
                "The viewport is not responsive and LCP is {:.0} ms, so mobile visitors get a slow desktop layout.",
                lcp
            ))
        },
    },
    Rule {
        id: "indexing-conflict",
        title: "Conflicting indexing signals",
        kind: IssueKind::CrossCategory,
        category: Category::Technical,
        severity: Severity::Critical,
        fix_complexity: FixComplexity::Easy,
        business_impact: BusinessImpact::High,
        affected_categories: &[Category::Technical, Category::OnPage],
        steps: &["Decide whether the page should be indexed", "Remove either noindex or the canonical"],
        validation: &["The page does not combine noindex with a canonical URL"],
        check: |ctx| {
            let t = ctx.technical()?;
            let o = ctx.on_page()?;
            if !t.noindex || o.canonical.is_none() {
                return None;
            }
            found_with(
                "The page declares a canonical URL but also tells search engines not to index it.",
                o.canonical.iter().cloned().collect(),
            )
        },
    },
    Rule {
        id: "thin-unstructured",
        title: "Thin content without structured data",
        kind: IssueKind::CrossCategory,
        category: Category::Content,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[Category::Content, Category::StructuredData],
        steps: &["Expand the content", "Describe it with matching JSON-LD"],
        validation: &["The page is above the thin-content threshold and has structured data"],
        check: |ctx| {
            let c = ctx.content()?;
            let s = ctx.structured_data()?;
            if !c.thin_content || s.json_ld_blocks > 0 {
                return None;
            }
            found("Search engines have little text and no structured data to understand the page.")
        },
    },
    Rule {
        id: "schema-content-mismatch",
        title: "Article schema on a short page",
        kind: IssueKind::CrossCategory,
        category: Category::StructuredData,
        severity: Severity::Medium,
        fix_complexity: FixComplexity::Medium,
        business_impact: BusinessImpact::Medium,
        affected_categories: &[Category::StructuredData, Category::Content],
        steps: &["Either expand the article or use a schema type that matches the page"],
        validation: &["Article-type schema only appears on pages above the low word count"],
        check: |ctx| {
            let c = ctx.content()?;
            let s = ctx.structured_data()?;
            let article_types: Vec<String> = s
                .schema_types
                .iter()
                .filter(|t| matches!(t.as_str(), "Article" | "BlogPosting" | "NewsArticle"))
                .cloned()
                .collect();
            if article_types.is_empty() || c.word_count >= ctx.thresholds.low_word_count {
                return None;
            }
            found_with(
                format!("The page is marked up as an article but has only {} words.", c.word_count),
                article_types,
            )
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_rule_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for rule in RULES.iter().chain(CROSS_CATEGORY_RULES) {
            assert!(seen.insert(rule.id), "duplicate rule id {}", rule.id);
        }
    }

    #[test]
    fn test_cross_category_rules_tag_categories() {
        for rule in CROSS_CATEGORY_RULES {
            assert!(rule.affected_categories.len() >= 2, "{} tags too few categories", rule.id);
            assert_eq!(rule.kind, IssueKind::CrossCategory);
        }
        assert!(RULES.iter().all(|r| r.affected_categories.is_empty()));
    }

    #[test]
    fn test_every_rule_has_guidance() {
        for rule in RULES.iter().chain(CROSS_CATEGORY_RULES) {
            assert!(!rule.steps.is_empty(), "{} has no steps", rule.id);
            assert!(!rule.validation.is_empty(), "{} has no validation", rule.id);
        }
    }
}
