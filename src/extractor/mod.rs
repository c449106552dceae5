//! Extraction modules: four independent passes over one parsed document.
//!
//! Each module is a `FactExtractor` producing a partial fact struct. The
//! `ExtractionSuite` runs all four against the same `Html` and turns any
//! module error or panic into the `Extracted::Unknown` sentinel so one broken
//! module never takes the rest of the page down with it.

pub mod content;
pub mod on_page;
pub mod readability;
pub mod structured_data;
pub mod technical;

pub use content::ContentExtractor;
pub use on_page::OnPageExtractor;
pub use structured_data::StructuredDataExtractor;
pub use technical::TechnicalExtractor;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::models::{
    ContentFacts, Extracted, OnPageFacts, ResponseMeta, StructuredDataFacts, TechnicalFacts,
};
use crate::error::Result;

/// One extraction pass over a parsed document.
///
/// Absent optional elements are facts (`None`, `false`, `0`), never errors.
/// Implementations hold no mutable state.
pub trait FactExtractor: Send + Sync {
    type Facts;

    /// Module name used in logs and `degraded_modules`.
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Html, response: &ResponseMeta, page_url: &Url)
        -> Result<Self::Facts>;
}

/// Output of running every module once.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub technical: Extracted<TechnicalFacts>,
    pub on_page: Extracted<OnPageFacts>,
    pub content: Extracted<ContentFacts>,
    pub structured_data: Extracted<StructuredDataFacts>,
    pub degraded: Vec<String>,
}

/// The four extraction modules, swappable for tests.
#[derive(Clone)]
pub struct ExtractionSuite {
    pub technical: Arc<dyn FactExtractor<Facts = TechnicalFacts>>,
    pub on_page: Arc<dyn FactExtractor<Facts = OnPageFacts>>,
    pub content: Arc<dyn FactExtractor<Facts = ContentFacts>>,
    pub structured_data: Arc<dyn FactExtractor<Facts = StructuredDataFacts>>,
}

impl Default for ExtractionSuite {
    fn default() -> Self {
        Self {
            technical: Arc::new(TechnicalExtractor),
            on_page: Arc::new(OnPageExtractor),
            content: Arc::new(ContentExtractor::default()),
            structured_data: Arc::new(StructuredDataExtractor),
        }
    }
}

impl ExtractionSuite {
    /// Parse `html` once and run every module against it.
    ///
    /// The document never leaves this call, so the caller can run it on a
    /// blocking worker while collaborator I/O proceeds elsewhere.
    pub fn run(&self, html: &str, response: &ResponseMeta, page_url: &Url) -> ExtractionOutput {
        let document = Html::parse_document(html);
        let mut degraded = Vec::new();

        let technical = guarded(self.technical.as_ref(), &document, response, page_url, &mut degraded);
        let on_page = guarded(self.on_page.as_ref(), &document, response, page_url, &mut degraded);
        let content = guarded(self.content.as_ref(), &document, response, page_url, &mut degraded);
        let structured_data = guarded(
            self.structured_data.as_ref(),
            &document,
            response,
            page_url,
            &mut degraded,
        );

        ExtractionOutput {
            technical,
            on_page,
            content,
            structured_data,
            degraded,
        }
    }
}

fn guarded<T>(
    extractor: &dyn FactExtractor<Facts = T>,
    document: &Html,
    response: &ResponseMeta,
    page_url: &Url,
    degraded: &mut Vec<String>,
) -> Extracted<T> {
    let name = extractor.name();
    let outcome = catch_unwind(AssertUnwindSafe(|| extractor.extract(document, response, page_url)));

    match outcome {
        Ok(Ok(facts)) => {
            tracing::debug!("[EXTRACT] {} facts extracted", name);
            Extracted::Known(facts)
        }
        Ok(Err(e)) => {
            tracing::warn!("[EXTRACT] {} module failed: {}", name, e);
            degraded.push(name.to_string());
            Extracted::unknown(e.to_string())
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            tracing::error!("[EXTRACT] {} module panicked: {}", name, reason);
            degraded.push(name.to_string());
            Extracted::unknown(format!("{} module panicked: {}", name, reason))
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ====== Shared document helpers ======

/// Compile a selector that is known to be valid at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css}: {e:?}"))
}

/// Trimmed text content of an element with inner whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text a reader would see: body text minus script/style/noscript/template.
pub(crate) fn visible_text(document: &Html) -> String {
    static BODY: std::sync::OnceLock<Selector> = std::sync::OnceLock::new();
    let body_selector = BODY.get_or_init(|| selector("body"));

    let Some(body) = document.select(body_selector).next() else {
        return String::new();
    };

    let mut out = String::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"))
                .unwrap_or(false)
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    out
}

/// `content` of the first `<meta>` matching `selector`, trimmed and non-empty.
pub(crate) fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Whole-token match of a robots directive list; `none` implies both
/// `noindex` and `nofollow`.
pub(crate) fn has_directive(value: &str, directive: &str) -> bool {
    value
        .split(',')
        .map(|d| d.trim().to_ascii_lowercase())
        .any(|d| d == directive || (d == "none" && matches!(directive, "noindex" | "nofollow")))
}

/// Canonical form used to compare page URLs: no fragment, no trailing slash.
pub(crate) fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    let s = url.to_string();
    s.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    struct Exploding;

    impl FactExtractor for Exploding {
        type Facts = StructuredDataFacts;

        fn name(&self) -> &'static str {
            "structured_data"
        }

        fn extract(&self, _: &Html, _: &ResponseMeta, _: &Url) -> Result<StructuredDataFacts> {
            Err(AnalysisError::extraction("structured_data", "boom"))
        }
    }

    struct Panicking;

    impl FactExtractor for Panicking {
        type Facts = ContentFacts;

        fn name(&self) -> &'static str {
            "content"
        }

        fn extract(&self, _: &Html, _: &ResponseMeta, _: &Url) -> Result<ContentFacts> {
            panic!("tokenizer bug")
        }
    }

    #[test]
    fn test_failing_module_degrades_to_unknown() {
        let suite = ExtractionSuite {
            structured_data: Arc::new(Exploding),
            ..Default::default()
        };
        let url = Url::parse("https://example.com/").unwrap();
        let out = suite.run("<html><head><title>Hi</title></head></html>", &ResponseMeta::ok(), &url);

        assert!(out.technical.is_known());
        assert!(out.on_page.is_known());
        assert!(out.content.is_known());
        assert!(!out.structured_data.is_known());
        assert_eq!(out.degraded, vec!["structured_data".to_string()]);
    }

    #[test]
    fn test_panicking_module_degrades_to_unknown() {
        let suite = ExtractionSuite {
            content: Arc::new(Panicking),
            ..Default::default()
        };
        let url = Url::parse("https://example.com/").unwrap();
        let out = suite.run("<p>text</p>", &ResponseMeta::ok(), &url);

        match &out.content {
            Extracted::Unknown { reason } => assert!(reason.contains("tokenizer bug")),
            Extracted::Known(_) => panic!("expected unknown content facts"),
        }
        assert_eq!(out.degraded, vec!["content".to_string()]);
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"
            <html><body>
                <p>Hello <b>world</b></p>
                <script>var hidden = 1;</script>
                <style>.x { color: red }</style>
                <noscript>enable js</noscript>
            </body></html>
        "#;
        let text = visible_text(&Html::parse_document(html));
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
        assert!(!text.contains("enable js"));
    }

    #[test]
    fn test_robots_directives_match_whole_tokens() {
        let value = "index, follow, max-image-preview:none";
        assert!(!has_directive(value, "noindex"));
        assert!(!has_directive(value, "nofollow"));
        assert!(has_directive("NOINDEX, follow", "noindex"));
        assert!(has_directive("none", "nofollow"));
    }

    #[test]
    fn test_normalize_url() {
        let a = Url::parse("https://example.com/page/#top").unwrap();
        let b = Url::parse("https://example.com/page").unwrap();
        assert_eq!(normalize_url(&a), normalize_url(&b));
    }
}
