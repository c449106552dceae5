// benches/pipeline_benchmarks.rs
use criterion::{criterion_group, criterion_main, Criterion};
use std::{hint::black_box, sync::Arc, time::Duration};
use tokio::runtime::Runtime;
use url::Url;

use seo_pulse::domain::models::PageInput;
use seo_pulse::extractor::ExtractionSuite;
use seo_pulse::service::{Orchestrator, StaticMetrics};
use seo_pulse::test_utils::fixtures;

fn bench_extraction(c: &mut Criterion) {
    let suite = ExtractionSuite::default();
    let html = fixtures::healthy_page_html();
    let response = fixtures::secure_response();
    let url = Url::parse(fixtures::PAGE_URL).unwrap();

    c.bench_function("extract_article_page", |b| {
        b.iter(|| black_box(suite.run(black_box(&html), &response, &url)));
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let orchestrator = Orchestrator::builder()
        .metrics(Arc::new(StaticMetrics::new(fixtures::good_metrics())))
        .build()
        .expect("default config is valid");
    let input = PageInput::new(fixtures::PAGE_URL, fixtures::healthy_page_html())
        .with_response(fixtures::secure_response())
        .rendered(true)
        .with_reference_time(fixtures::reference_time());

    c.bench_function("analyze_article_page", |b| {
        b.to_async(&rt).iter(|| async {
            let result = orchestrator.analyze(black_box(input.clone())).await;
            black_box(result)
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(10));
    targets = bench_extraction, bench_full_pipeline
}

criterion_main!(benches);
