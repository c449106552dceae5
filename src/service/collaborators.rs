//! Collaborator seams the pipeline consumes but never implements over the network.
//!
//! - `MetricsProvider`: runtime metrics from a browser-automation run
//! - `SiteResourceChecker`: robots.txt / sitemap.xml existence
//!
//! The static implementations here cover the CLI and tests; a fetching
//! service plugs its own implementations in through `Orchestrator::builder`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::models::{PerformanceMetrics, ResourceStatus};

/// Source of runtime performance metrics for a page.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// `Ok(None)` means no metrics are available for this page.
    async fn metrics(&self, url: &Url) -> Result<Option<PerformanceMetrics>>;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str;
}

/// Site-level resource existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResources {
    pub robots_txt: ResourceStatus,
    pub sitemap: ResourceStatus,
}

#[async_trait]
pub trait SiteResourceChecker: Send + Sync {
    async fn check(&self, base_url: &Url) -> Result<SiteResources>;

    fn name(&self) -> &'static str;
}

// ====== Static implementations ======

/// Always reports that no metrics exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetrics;

#[async_trait]
impl MetricsProvider for NoMetrics {
    async fn metrics(&self, _url: &Url) -> Result<Option<PerformanceMetrics>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Serves metrics captured earlier, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticMetrics {
    metrics: PerformanceMetrics,
}

impl StaticMetrics {
    pub fn new(metrics: PerformanceMetrics) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl MetricsProvider for StaticMetrics {
    async fn metrics(&self, url: &Url) -> Result<Option<PerformanceMetrics>> {
        tracing::debug!("[METRICS] serving static metrics for {}", url);
        Ok(Some(self.metrics.clone()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Leaves both resources `not_checked`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncheckedResources;

#[async_trait]
impl SiteResourceChecker for UncheckedResources {
    async fn check(&self, _base_url: &Url) -> Result<SiteResources> {
        Ok(SiteResources::default())
    }

    fn name(&self) -> &'static str {
        "unchecked"
    }
}

/// Reports resource statuses that are already known to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownResources {
    resources: SiteResources,
}

impl KnownResources {
    pub fn new(robots_txt: ResourceStatus, sitemap: ResourceStatus) -> Self {
        Self {
            resources: SiteResources { robots_txt, sitemap },
        }
    }
}

#[async_trait]
impl SiteResourceChecker for KnownResources {
    async fn check(&self, base_url: &Url) -> Result<SiteResources> {
        tracing::debug!(
            "[RESOURCE] {}: robots.txt={} sitemap={}",
            base_url,
            self.resources.robots_txt.as_str(),
            self.resources.sitemap.as_str()
        );
        Ok(self.resources)
    }

    fn name(&self) -> &'static str {
        "known"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_no_metrics() {
        let metrics = tokio_test::block_on(NoMetrics.metrics(&url())).unwrap();
        assert!(metrics.is_none());
    }

    #[tokio::test]
    async fn test_static_metrics_are_returned() {
        let provider = StaticMetrics::new(PerformanceMetrics {
            lcp_ms: Some(1800.0),
            ..Default::default()
        });
        let metrics = provider.metrics(&url()).await.unwrap().unwrap();
        assert_eq!(metrics.lcp_ms, Some(1800.0));
    }

    #[tokio::test]
    async fn test_resource_checkers() {
        let unchecked = UncheckedResources.check(&url()).await.unwrap();
        assert_eq!(unchecked.robots_txt, ResourceStatus::NotChecked);

        let known = KnownResources::new(ResourceStatus::Present, ResourceStatus::Missing)
            .check(&url())
            .await
            .unwrap();
        assert!(known.robots_txt.exists());
        assert!(known.sitemap.is_missing());
    }
}
