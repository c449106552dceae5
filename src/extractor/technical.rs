//! Technical facts: transport, indexing directives, security headers,
//! viewport, hreflang and redirects.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use super::{has_directive, meta_content, selector, FactExtractor};
use crate::domain::models::{HreflangLink, ResponseMeta, TechnicalFacts};
use crate::error::Result;

/// Response headers checked for presence, lowercase.
pub const SECURITY_HEADERS: [&str; 6] = [
    "strict-transport-security",
    "content-security-policy",
    "x-content-type-options",
    "x-frame-options",
    "referrer-policy",
    "permissions-policy",
];

pub struct TechnicalExtractor;

impl FactExtractor for TechnicalExtractor {
    type Facts = TechnicalFacts;

    fn name(&self) -> &'static str {
        "technical"
    }

    fn extract(&self, document: &Html, response: &ResponseMeta, page_url: &Url) -> Result<TechnicalFacts> {
        let final_url = response
            .final_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .unwrap_or_else(|| page_url.clone());

        let (security_headers, missing_security_headers) = Self::security_headers(response);

        let robots_meta = Self::robots_meta(document);
        let x_robots_tag = response.header("x-robots-tag").map(str::to_string);
        let directives = [robots_meta.as_deref(), x_robots_tag.as_deref()];
        let noindex = directives.iter().flatten().any(|d| has_directive(d, "noindex"));
        let nofollow = directives.iter().flatten().any(|d| has_directive(d, "nofollow"));

        let viewport = Self::viewport(document);
        let responsive_viewport = viewport
            .as_deref()
            .map(|v| v.replace(' ', "").to_ascii_lowercase().contains("width=device-width"))
            .unwrap_or(false);

        let redirect_count = response.redirect_chain.len();
        let final_differs = response
            .final_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .map(|u| super::normalize_url(&u) != super::normalize_url(page_url))
            .unwrap_or(false);
        let redirected =
            (300..400).contains(&response.status_code) || redirect_count > 0 || final_differs;

        let facts = TechnicalFacts {
            has_https: final_url.scheme() == "https",
            canonical: Self::canonical(document),
            security_headers,
            missing_security_headers,
            robots_meta,
            x_robots_tag,
            noindex,
            nofollow,
            viewport,
            responsive_viewport,
            hreflang: Self::hreflang(document, page_url),
            status_code: response.status_code,
            redirected,
            redirect_count,
            final_url: response.final_url.clone(),
            http2: response.protocol.as_deref().map(is_http2),
            compression: response
                .header("content-encoding")
                .map(|v| v.to_ascii_lowercase())
                .filter(|v| !v.is_empty() && v != "identity"),
            ..Default::default()
        };

        tracing::debug!(
            "[EXTRACT] technical: https={} noindex={} missing_security_headers={}",
            facts.has_https,
            facts.noindex,
            facts.missing_security_headers.len()
        );

        Ok(facts)
    }
}

impl TechnicalExtractor {
    fn canonical(document: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("link[rel='canonical']"));
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn robots_meta(document: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("meta[name='robots']"));
        meta_content(document, selector)
    }

    fn viewport(document: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("meta[name='viewport']"));
        meta_content(document, selector)
    }

    fn security_headers(response: &ResponseMeta) -> (BTreeSet<String>, BTreeSet<String>) {
        SECURITY_HEADERS
            .iter()
            .map(|h| h.to_string())
            .partition(|h| response.header(h).map(|v| !v.is_empty()).unwrap_or(false))
    }

    fn hreflang(document: &Html, page_url: &Url) -> Vec<HreflangLink> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| selector("link[rel='alternate'][hreflang]"));

        document
            .select(selector)
            .filter_map(|el| {
                let lang = el.value().attr("hreflang")?.trim().to_string();
                let raw_href = el.value().attr("href").unwrap_or("").trim();
                let href = page_url
                    .join(raw_href)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| raw_href.to_string());
                let valid = !raw_href.is_empty() && is_valid_hreflang(&lang);
                Some(HreflangLink { lang, href, valid })
            })
            .collect()
    }
}

/// `x-default` or an ISO 639 language with optional region/script subtags.
pub fn is_valid_hreflang(code: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(?i:x-default|[a-z]{2,3}(-[a-z0-9]{2,8})*)$").expect("valid hreflang regex")
    });
    re.is_match(code)
}

fn is_http2(protocol: &str) -> bool {
    let p = protocol.trim().to_ascii_uppercase();
    p == "H2" || p.starts_with("HTTP/2")
}
