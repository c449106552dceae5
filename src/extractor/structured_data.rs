//! JSON-LD and microdata.
//!
//! A block that fails to parse is recorded as `"block N: <error>"` and the
//! remaining blocks are still read.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use super::content::parse_date;
use super::{selector, FactExtractor};
use crate::domain::models::{ResponseMeta, StructuredDataFacts};
use crate::error::Result;

/// Schema types eligible for rich results.
pub const RICH_RESULT_TYPES: [&str; 4] = ["BreadcrumbList", "Article", "Product", "FAQPage"];

pub struct StructuredDataExtractor;

impl FactExtractor for StructuredDataExtractor {
    type Facts = StructuredDataFacts;

    fn name(&self) -> &'static str {
        "structured_data"
    }

    fn extract(&self, document: &Html, _response: &ResponseMeta, _page_url: &Url) -> Result<StructuredDataFacts> {
        static SCRIPTS: OnceLock<Selector> = OnceLock::new();
        let scripts = SCRIPTS.get_or_init(|| selector("script[type]"));

        let mut facts = StructuredDataFacts::default();
        // every @type occurrence, duplicates included
        let mut all_types: Vec<String> = Vec::new();

        let blocks = document
            .select(scripts)
            .filter(|el| el.value().attr("type").map(is_json_ld_type).unwrap_or(false));
        for (index, block) in blocks.enumerate() {
            facts.json_ld_blocks += 1;
            let raw = block.text().collect::<String>();
            let value: Value = match serde_json::from_str(raw.trim()) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!("[EXTRACT] JSON-LD block {} rejected: {}", index + 1, e);
                    facts.json_ld_errors.push(format!("block {}: {}", index + 1, e));
                    continue;
                }
            };

            let mut entities = Vec::new();
            collect_entities(&value, &mut entities);
            for entity in entities {
                all_types.extend(entity_types(entity));
                if facts.date_published.is_none() {
                    facts.date_published = date_field(entity, "datePublished");
                }
                if facts.date_modified.is_none() {
                    facts.date_modified = date_field(entity, "dateModified");
                }
            }
        }

        facts.schema_types = all_types.iter().cloned().collect();
        facts.duplicate_schemas = facts.schema_types.len() < all_types.len();
        if facts.duplicate_schemas {
            let mut seen = BTreeSet::new();
            facts.duplicate_types = all_types
                .iter()
                .filter(|t| !seen.insert(t.as_str()))
                .cloned()
                .collect();
        }

        facts.rich_result_types = facts
            .schema_types
            .iter()
            .filter(|t| RICH_RESULT_TYPES.contains(&t.as_str()))
            .cloned()
            .collect();
        facts.rich_results_eligible = !facts.rich_result_types.is_empty();
        facts.microdata_types = microdata_types(document);

        tracing::debug!(
            "[EXTRACT] structured_data: blocks={} types={:?} errors={}",
            facts.json_ld_blocks,
            facts.schema_types,
            facts.json_ld_errors.len()
        );

        Ok(facts)
    }
}

/// `application/ld+json`, ignoring case and media-type parameters such as `charset`.
fn is_json_ld_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/ld+json"))
        .unwrap_or(false)
}

/// Objects that carry schema: the value itself, array members and `@graph` members.
fn collect_entities<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_entities(item, out);
            }
        }
        Value::Object(map) => {
            if map.contains_key("@type") {
                out.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                collect_entities(graph, out);
            }
        }
        _ => {}
    }
}

fn entity_types(entity: &Value) -> Vec<String> {
    match entity.get("@type") {
        Some(Value::String(t)) => vec![short_type(t)],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(short_type)
            .collect(),
        _ => Vec::new(),
    }
}

/// `https://schema.org/Article` and `Article` are the same type.
fn short_type(raw: &str) -> String {
    raw.trim()
        .rsplit('/')
        .next()
        .unwrap_or(raw)
        .to_string()
}

fn date_field(entity: &Value, field: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    entity.get(field).and_then(Value::as_str).and_then(parse_date)
}

fn microdata_types(document: &Html) -> BTreeSet<String> {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    let selector = SELECTOR.get_or_init(|| selector("[itemscope][itemtype]"));
    document
        .select(selector)
        .filter_map(|el| el.value().attr("itemtype"))
        .flat_map(|types| types.split_whitespace())
        .map(short_type)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> StructuredDataFacts {
        let document = Html::parse_document(html);
        let url = Url::parse("https://example.com/").unwrap();
        StructuredDataExtractor
            .extract(&document, &ResponseMeta::ok(), &url)
            .unwrap()
    }

    #[test]
    fn test_json_ld_type_with_parameters_is_read() {
        let html = r#"
            <script type="Application/LD+JSON; charset=utf-8">
            {"@context": "https://schema.org", "@type": "FAQPage"}
            </script>
            <script type="application/json">{"@type": "Article"}</script>
        "#;
        let facts = extract(html);
        assert_eq!(facts.json_ld_blocks, 1);
        assert!(facts.schema_types.contains("FAQPage"));
        assert!(!facts.schema_types.contains("Article"));
    }

    #[test]
    fn test_single_article_is_rich_result_eligible() {
        let html = r#"
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Article",
             "headline": "Guide", "datePublished": "2024-02-01"}
            </script>
        "#;
        let facts = extract(html);
        assert_eq!(facts.json_ld_blocks, 1);
        assert!(facts.schema_types.contains("Article"));
        assert!(facts.rich_results_eligible);
        assert!(!facts.duplicate_schemas);
        assert!(facts.json_ld_errors.is_empty());
        assert!(facts.date_published.is_some());
    }

    #[test]
    fn test_malformed_block_is_recorded_and_skipped() {
        let html = r#"
            <script type="application/ld+json">{ "@type": "Product", </script>
            <script type="application/ld+json">{"@type": "Organization"}</script>
        "#;
        let facts = extract(html);
        assert_eq!(facts.json_ld_blocks, 2);
        assert_eq!(facts.json_ld_errors.len(), 1);
        assert!(facts.json_ld_errors[0].starts_with("block 1:"));
        assert!(facts.schema_types.contains("Organization"));
        assert!(!facts.rich_results_eligible);
    }

    #[test]
    fn test_graph_arrays_and_duplicates() {
        let html = r#"
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage"},
                {"@type": ["Article", "NewsArticle"]},
                {"@type": "BreadcrumbList"}
            ]}
            </script>
            <script type="application/ld+json">[{"@type": "https://schema.org/Article"}]</script>
        "#;
        let facts = extract(html);
        let types: Vec<&str> = facts.schema_types.iter().map(String::as_str).collect();
        assert_eq!(types, vec!["Article", "BreadcrumbList", "NewsArticle", "WebPage"]);
        assert!(facts.duplicate_schemas);
        assert!(facts.duplicate_types.contains("Article"));
        assert_eq!(facts.rich_result_types.len(), 2);
    }

    #[test]
    fn test_microdata_types() {
        let html = r#"<div itemscope itemtype="https://schema.org/Product"><span>Thing</span></div>"#;
        let facts = extract(html);
        assert_eq!(facts.json_ld_blocks, 0);
        assert!(facts.microdata_types.contains("Product"));
        assert!(!facts.rich_results_eligible);
    }
}
