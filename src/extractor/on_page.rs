//! On-page facts: title, meta description, headings, images, social tags,
//! canonical consistency and links.

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use super::{element_text, has_directive, meta_content, normalize_url, selector, FactExtractor};
use crate::domain::models::{Headings, OnPageFacts, OpenGraphTags, ResponseMeta};
use crate::error::Result;

pub struct OnPageExtractor;

impl FactExtractor for OnPageExtractor {
    type Facts = OnPageFacts;

    fn name(&self) -> &'static str {
        "on_page"
    }

    fn extract(&self, document: &Html, _response: &ResponseMeta, page_url: &Url) -> Result<OnPageFacts> {
        let title = Self::extract_title(document);
        let meta_description = Self::extract_meta_description(document);
        let (headings, heading_hierarchy_skips) = Self::extract_headings(document);
        let (images_total, images_missing_alt) = Self::extract_images(document, page_url);
        let canonical = Self::extract_canonical(document);
        let canonical_matches_url = canonical
            .as_deref()
            .and_then(|href| page_url.join(href).ok())
            .map(|resolved| normalize_url(&resolved) == normalize_url(page_url));
        let robots = Self::extract_robots(document);
        let (internal_links, external_links) = Self::count_links(document, page_url);

        let facts = OnPageFacts {
            title_length: title.as_deref().map(|t| t.chars().count()).unwrap_or(0),
            title,
            meta_description_length: meta_description
                .as_deref()
                .map(|d| d.chars().count())
                .unwrap_or(0),
            meta_description,
            headings,
            heading_hierarchy_skips,
            images_total,
            images_missing_alt_count: images_missing_alt.len(),
            images_missing_alt,
            open_graph: Self::extract_open_graph(document),
            twitter_card: Self::extract_twitter_card(document),
            canonical,
            canonical_matches_url,
            noindex: robots
                .as_deref()
                .map(|r| has_directive(r, "noindex"))
                .unwrap_or(false),
            nofollow: robots
                .as_deref()
                .map(|r| has_directive(r, "nofollow"))
                .unwrap_or(false),
            has_favicon: Self::has_favicon(document),
            lang: Self::extract_lang(document),
            internal_links,
            external_links,
            duplicate_title: None,
            duplicate_meta_description: None,
        };

        tracing::debug!(
            "[EXTRACT] on_page: title={:?} h1={} images_missing_alt={}",
            facts.title,
            facts.headings.h1.len(),
            facts.images_missing_alt_count
        );

        Ok(facts)
    }
}

impl OnPageExtractor {
    pub fn extract_title(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("title"));
        html.select(selector)
            .next()
            .map(|el| element_text(&el))
            .filter(|s| !s.is_empty())
    }

    pub fn extract_meta_description(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("meta[name='description']"));
        meta_content(html, selector)
    }

    pub fn extract_canonical(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("link[rel='canonical']"));
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_robots(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("meta[name='robots']"));
        meta_content(html, selector)
    }

    /// Headings by level plus every place the level jumps by more than one.
    pub fn extract_headings(html: &Html) -> (Headings, Vec<String>) {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("h1, h2, h3, h4, h5, h6"));

        let mut headings = Headings::default();
        let mut skips = Vec::new();
        let mut previous: Option<u8> = None;

        for element in html.select(selector) {
            let Some(level) = element
                .value()
                .name()
                .trim_start_matches('h')
                .parse::<u8>()
                .ok()
            else {
                continue;
            };
            let text = element_text(&element);
            if text.is_empty() {
                continue;
            }

            if let Some(prev) = previous {
                if level > prev + 1 {
                    skips.push(format!("h{}→h{}", prev, level));
                }
            }
            previous = Some(level);

            if let Some(bucket) = headings.level_mut(level) {
                bucket.push(text);
            }
        }

        (headings, skips)
    }

    /// Total images and the resolved `src` of each one without an `alt` attribute.
    ///
    /// `alt=""` marks a decorative image and is accepted.
    pub fn extract_images(html: &Html, page_url: &Url) -> (usize, Vec<String>) {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("img"));

        let mut total = 0;
        let mut missing = Vec::new();
        for element in html.select(selector) {
            total += 1;
            if element.value().attr("alt").is_some() {
                continue;
            }
            let src = element.value().attr("src").unwrap_or("").trim();
            let resolved = if src.is_empty() {
                format!("img[{}]", total - 1)
            } else {
                page_url
                    .join(src)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| src.to_string())
            };
            missing.push(resolved);
        }
        (total, missing)
    }

    pub fn extract_open_graph(html: &Html) -> OpenGraphTags {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("meta[property]"));

        let mut tags = OpenGraphTags::default();
        for element in html.select(selector) {
            let Some(property) = element.value().attr("property") else {
                continue;
            };
            let Some(content) = element
                .value()
                .attr("content")
                .map(str::trim)
                .filter(|c| !c.is_empty())
            else {
                continue;
            };
            let slot = match property.trim().to_ascii_lowercase().as_str() {
                "og:title" => &mut tags.title,
                "og:description" => &mut tags.description,
                "og:image" => &mut tags.image,
                "og:url" => &mut tags.url,
                "og:type" => &mut tags.og_type,
                "og:site_name" => &mut tags.site_name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(content.to_string());
            }
        }
        tags
    }

    pub fn extract_twitter_card(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| {
            selector("meta[name='twitter:card'], meta[property='twitter:card']")
        });
        meta_content(html, selector)
    }

    fn has_favicon(html: &Html) -> bool {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("link[rel~='icon']"));
        html.select(selector).next().is_some()
    }

    fn extract_lang(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("html[lang]"));
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Internal vs external anchors, skipping fragments and non-navigational schemes.
    pub fn count_links(html: &Html, page_url: &Url) -> (usize, usize) {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("a[href]"));

        let host = page_url.host_str().map(|h| h.trim_start_matches("www.").to_string());
        let mut internal = 0;
        let mut external = 0;

        for element in html.select(selector) {
            let Some(href) = element.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
                || href.starts_with("tel:")
            {
                continue;
            }
            let Ok(resolved) = page_url.join(href) else {
                continue;
            };
            let same_host = resolved
                .host_str()
                .map(|h| Some(h.trim_start_matches("www.").to_string()) == host)
                .unwrap_or(false);
            if same_host {
                internal += 1;
            } else {
                external += 1;
            }
        }

        (internal, external)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, url: &str) -> OnPageFacts {
        let document = Html::parse_document(html);
        let url = Url::parse(url).unwrap();
        OnPageExtractor
            .extract(&document, &ResponseMeta::ok(), &url)
            .unwrap()
    }

    #[test]
    fn test_title_and_meta_description() {
        let html = r#"
            <html><head>
              <title>  Rust   SEO Guide </title>
              <meta name="description" content="Everything about it.">
            </head></html>
        "#;
        let facts = extract(html, "https://example.com/");
        assert_eq!(facts.title.as_deref(), Some("Rust SEO Guide"));
        assert_eq!(facts.title_length, 14);
        assert_eq!(facts.meta_description_length, 20);
    }

    #[test]
    fn test_missing_title_is_a_fact() {
        let facts = extract("<html><body><p>no head</p></body></html>", "https://example.com/");
        assert!(facts.title.is_none());
        assert_eq!(facts.title_length, 0);
        assert!(facts.meta_description.is_none());
    }

    #[test]
    fn test_heading_skips() {
        let html = r#"<body><h1>Top</h1><h2>Section</h2><h4>Deep</h4><h2>Next</h2><h3></h3></body>"#;
        let facts = extract(html, "https://example.com/");
        assert_eq!(facts.headings.h1, vec!["Top".to_string()]);
        assert_eq!(facts.headings.h2.len(), 2);
        assert!(facts.headings.h3.is_empty());
        assert_eq!(facts.heading_hierarchy_skips, vec!["h2→h4".to_string()]);
    }

    #[test]
    fn test_decorative_images_are_not_missing_alt() {
        let html = r#"
            <body>
              <img src="/a.png" alt="A chart">
              <img src="/spacer.gif" alt="">
              <img src="/b.png">
            </body>
        "#;
        let facts = extract(html, "https://example.com/blog/");
        assert_eq!(facts.images_total, 3);
        assert_eq!(facts.images_missing_alt_count, 1);
        assert_eq!(facts.images_missing_alt, vec!["https://example.com/b.png".to_string()]);
    }

    #[test]
    fn test_social_tags() {
        let html = r#"
            <head>
              <meta property="og:title" content="Guide">
              <meta property="og:type" content="article">
              <meta name="twitter:card" content="summary_large_image">
            </head>
        "#;
        let facts = extract(html, "https://example.com/");
        assert_eq!(facts.open_graph.title.as_deref(), Some("Guide"));
        assert_eq!(facts.open_graph.og_type.as_deref(), Some("article"));
        assert_eq!(facts.open_graph.missing_core(), vec!["og:description", "og:image"]);
        assert_eq!(facts.twitter_card.as_deref(), Some("summary_large_image"));
    }

    #[test]
    fn test_canonical_consistency_ignores_trailing_slash() {
        let html = r#"<head><link rel="canonical" href="https://example.com/guide/"></head>"#;
        let facts = extract(html, "https://example.com/guide#intro");
        assert_eq!(facts.canonical_matches_url, Some(true));

        let html = r#"<head><link rel="canonical" href="/other"></head>"#;
        let facts = extract(html, "https://example.com/guide");
        assert_eq!(facts.canonical_matches_url, Some(false));

        let facts = extract("<head></head>", "https://example.com/guide");
        assert_eq!(facts.canonical_matches_url, None);
    }

    #[test]
    fn test_favicon_lang_and_links() {
        let html = r##"
            <html lang="en">
            <head><link rel="shortcut icon" href="/favicon.ico"></head>
            <body>
              <a href="/about">About</a>
              <a href="https://www.example.com/contact">Contact</a>
              <a href="https://rust-lang.org">Rust</a>
              <a href="#top">Top</a>
              <a href="mailto:hi@example.com">Mail</a>
            </body></html>
        "##;
        let facts = extract(html, "https://example.com/");
        assert!(facts.has_favicon);
        assert_eq!(facts.lang.as_deref(), Some("en"));
        assert_eq!(facts.internal_links, 2);
        assert_eq!(facts.external_links, 1);
        assert_eq!(facts.duplicate_title, None);
    }

    #[test]
    fn test_robots_preview_directive_is_not_noindex() {
        let html = r#"<head><meta name="robots" content="index, follow, max-image-preview:none"></head>"#;
        let facts = extract(html, "https://example.com/");
        assert!(!facts.noindex);
        assert!(!facts.nofollow);

        let html = r#"<head><meta name="robots" content="NoIndex, nofollow"></head>"#;
        let facts = extract(html, "https://example.com/");
        assert!(facts.noindex);
        assert!(facts.nofollow);
    }
}
