//! Recommendation templates keyed by `(category, issue id)`.
//!
//! Unknown issue ids fall back to a category-generic template, so every
//! issue always maps to something.

use crate::domain::models::{Category, Difficulty};

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub title: &'static str,
    pub description: &'static str,
    pub tools: &'static [&'static str],
    /// None derives difficulty from the issue's fix complexity.
    pub difficulty: Option<Difficulty>,
    /// None derives the estimate from the issue's fix complexity.
    pub estimated_hours: Option<u32>,
    /// None derives the range from the issue's business impact.
    pub traffic_uplift: Option<&'static str>,
}

struct Entry {
    category: Category,
    issue_id: &'static str,
    template: Template,
}

static TEMPLATES: &[Entry] = &[
    Entry {
        category: Category::Technical,
        issue_id: "no-ssl",
        template: Template {
            title: "Migrate the site to HTTPS",
            description: "Serve every page over TLS and redirect insecure URLs.",
            tools: &["Let's Encrypt", "Certbot", "SSL Labs"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(4),
            traffic_uplift: Some("5-10%"),
        },
    },
    Entry {
        category: Category::Technical,
        issue_id: "noindex-directive",
        template: Template {
            title: "Allow the page to be indexed",
            description: "Remove the noindex directive so the page can rank.",
            tools: &["Search Console URL Inspection"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: Some(1),
            traffic_uplift: Some("10-100%"),
        },
    },
    Entry {
        category: Category::Technical,
        issue_id: "missing-viewport",
        template: Template {
            title: "Make the page mobile friendly",
            description: "Declare a responsive viewport so mobile browsers render at device width.",
            tools: &["Chrome DevTools device mode", "Lighthouse"],
            difficulty: None,
            estimated_hours: Some(1),
            traffic_uplift: Some("3-8%"),
        },
    },
    Entry {
        category: Category::Technical,
        issue_id: "mobile-experience-gap",
        template: Template {
            title: "Fix the mobile experience",
            description: "Combine a responsive layout with a faster largest paint on mobile.",
            tools: &["Lighthouse", "PageSpeed Insights", "Chrome DevTools"],
            difficulty: Some(Difficulty::Advanced),
            estimated_hours: Some(24),
            traffic_uplift: Some("5-15%"),
        },
    },
    Entry {
        category: Category::Technical,
        issue_id: "indexing-conflict",
        template: Template {
            title: "Resolve conflicting indexing signals",
            description: "Send one consistent signal about whether and where this page is indexed.",
            tools: &["Search Console URL Inspection"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: Some(1),
            traffic_uplift: None,
        },
    },
    Entry {
        category: Category::OnPage,
        issue_id: "missing-title",
        template: Template {
            title: "Write a descriptive title tag",
            description: "A unique title with the primary keyword is the strongest on-page signal.",
            tools: &["SERP snippet preview"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: Some(1),
            traffic_uplift: Some("5-15%"),
        },
    },
    Entry {
        category: Category::OnPage,
        issue_id: "missing-meta-description",
        template: Template {
            title: "Write a compelling meta description",
            description: "Control the search snippet to raise click-through rate.",
            tools: &["SERP snippet preview"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: Some(1),
            traffic_uplift: Some("2-8%"),
        },
    },
    Entry {
        category: Category::OnPage,
        issue_id: "images-missing-alt",
        template: Template {
            title: "Add alt text to images",
            description: "Alt text makes images accessible and eligible for image search.",
            tools: &["axe DevTools", "WAVE"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: None,
            traffic_uplift: Some("1-3%"),
        },
    },
    Entry {
        category: Category::OnPage,
        issue_id: "canonical-mismatch",
        template: Template {
            title: "Correct the canonical URL",
            description: "Point the canonical at the URL that should rank.",
            tools: &["Search Console URL Inspection"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(2),
            traffic_uplift: None,
        },
    },
    Entry {
        category: Category::Content,
        issue_id: "thin-content",
        template: Template {
            title: "Expand thin content",
            description: "Add original, in-depth material that answers the searcher's question.",
            tools: &["Keyword research tool", "Content brief template"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(12),
            traffic_uplift: Some("10-30%"),
        },
    },
    Entry {
        category: Category::Content,
        issue_id: "keyword-stuffing",
        template: Template {
            title: "Rewrite over-optimized copy",
            description: "Natural language ranks better than repeated keywords.",
            tools: &["Readability checker"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(4),
            traffic_uplift: None,
        },
    },
    Entry {
        category: Category::Content,
        issue_id: "stale-content",
        template: Template {
            title: "Refresh outdated content",
            description: "Update facts, examples and dates so the page stays relevant.",
            tools: &["Content calendar"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(6),
            traffic_uplift: Some("5-20%"),
        },
    },
    Entry {
        category: Category::StructuredData,
        issue_id: "missing-structured-data",
        template: Template {
            title: "Add structured data",
            description: "Describe the page with schema.org JSON-LD to unlock rich results.",
            tools: &["Rich Results Test", "Schema Markup Validator"],
            difficulty: Some(Difficulty::Intermediate),
            estimated_hours: Some(3),
            traffic_uplift: Some("5-15%"),
        },
    },
    Entry {
        category: Category::StructuredData,
        issue_id: "invalid-json-ld",
        template: Template {
            title: "Repair malformed JSON-LD",
            description: "Broken blocks are ignored by search engines.",
            tools: &["Schema Markup Validator", "JSON linter"],
            difficulty: Some(Difficulty::Beginner),
            estimated_hours: Some(1),
            traffic_uplift: None,
        },
    },
    Entry {
        category: Category::Ux,
        issue_id: "poor-performance-score",
        template: Template {
            title: "Overhaul page performance",
            description: "A systematic performance pass on assets, scripts and server response.",
            tools: &["Lighthouse", "WebPageTest", "Chrome DevTools Performance panel"],
            difficulty: Some(Difficulty::Expert),
            estimated_hours: Some(40),
            traffic_uplift: Some("5-20%"),
        },
    },
    Entry {
        category: Category::Ux,
        issue_id: "slow-lcp",
        template: Template {
            title: "Speed up the largest contentful paint",
            description: "Deliver the main content element faster.",
            tools: &["Lighthouse", "PageSpeed Insights"],
            difficulty: Some(Difficulty::Advanced),
            estimated_hours: Some(16),
            traffic_uplift: Some("3-10%"),
        },
    },
];

static TECHNICAL_GENERIC: Template = Template {
    title: "Resolve technical SEO issue",
    description: "Fix the underlying technical problem so crawlers can access and trust the page.",
    tools: &["Search Console", "Screaming Frog"],
    difficulty: None,
    estimated_hours: None,
    traffic_uplift: None,
};

static CONTENT_GENERIC: Template = Template {
    title: "Improve content quality",
    description: "Make the copy more useful, readable and focused on the searcher's intent.",
    tools: &["Readability checker", "Keyword research tool"],
    difficulty: None,
    estimated_hours: None,
    traffic_uplift: None,
};

static ON_PAGE_GENERIC: Template = Template {
    title: "Optimize on-page elements",
    description: "Tune the page's HTML signals so search engines understand its topic.",
    tools: &["SERP snippet preview", "Browser DevTools"],
    difficulty: None,
    estimated_hours: None,
    traffic_uplift: None,
};

static GENERIC: Template = Template {
    title: "Address SEO issue",
    description: "Apply the listed implementation steps and re-run the analysis.",
    tools: &["Lighthouse"],
    difficulty: None,
    estimated_hours: None,
    traffic_uplift: None,
};

/// Specific template for the issue, or the category's generic one.
pub fn lookup(category: Category, issue_id: &str) -> &'static Template {
    TEMPLATES
        .iter()
        .find(|e| e.category == category && e.issue_id == issue_id)
        .map(|e| &e.template)
        .unwrap_or_else(|| generic(category))
}

pub fn generic(category: Category) -> &'static Template {
    match category {
        Category::Technical => &TECHNICAL_GENERIC,
        Category::Content => &CONTENT_GENERIC,
        Category::OnPage => &ON_PAGE_GENERIC,
        Category::StructuredData | Category::Ux => &GENERIC,
    }
}
