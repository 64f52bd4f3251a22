//! Benchmarks for the hybrid document index.
//!
//! Benchmark targets:
//! - 100 documents: fast enough to not dominate a CLI invocation
//! - 1,000 documents: still sub-50ms for any single search mode
//! - 10,000 documents: the scaling ceiling for an in-memory index
//!
//! Exercises the full pipeline: query embedding, vector similarity search,
//! BM25 keyword search, and RRF fusion for hybrid mode.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::time::Duration;

use mind::retrieval::{DocumentIndex, HashEmbedder};
use mind::{RetrievalConfig, SearchMode};

/// Sample technical content for populating the index.
const SAMPLE_CONTENT: &[&str] = &[
    "PostgreSQL database configuration with connection pooling",
    "Redis caching layer implementation with TTL",
    "JWT authentication token validation flow",
    "Microservices architecture with event sourcing",
    "Kubernetes deployment configuration with autoscaling",
    "GraphQL API design patterns and best practices",
    "Docker container orchestration strategies",
    "CI/CD pipeline with GitHub Actions",
    "Performance optimization for Node.js applications",
    "Security audit checklist for web applications",
];

/// Builds an index with the given number of documents.
fn build_index(count: usize) -> DocumentIndex<HashEmbedder> {
    let config = RetrievalConfig::default();
    let embedder = HashEmbedder::new(config.embedding_dimensions);
    let mut index = DocumentIndex::new(embedder, config);

    for i in 0..count {
        let content = SAMPLE_CONTENT[i % SAMPLE_CONTENT.len()];
        index
            .add(format!("doc-{i}"), format!("{content} - instance {i}"))
            .expect("add should succeed");
    }

    index
}

fn bench_search_100(c: &mut Criterion) {
    let index = build_index(100);

    let mut group = c.benchmark_group("search_100_documents");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("keyword_search", |b| {
        b.iter(|| {
            index
                .search("database configuration", SearchMode::KeywordOnly, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("hybrid_search", |b| {
        b.iter(|| {
            index
                .search("database configuration", SearchMode::Hybrid, 10)
                .expect("search should succeed")
        });
    });

    group.finish();
}

fn bench_search_1000(c: &mut Criterion) {
    let index = build_index(1000);

    let mut group = c.benchmark_group("search_1000_documents");
    group.measurement_time(Duration::from_secs(15));

    group.bench_function("keyword_search", |b| {
        b.iter(|| {
            index
                .search("authentication security", SearchMode::KeywordOnly, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("hybrid_search", |b| {
        b.iter(|| {
            index
                .search("authentication security", SearchMode::Hybrid, 10)
                .expect("search should succeed")
        });
    });

    group.finish();
}

fn bench_search_10000(c: &mut Criterion) {
    let index = build_index(10_000);

    let mut group = c.benchmark_group("search_10000_documents");
    group.measurement_time(Duration::from_secs(20));

    group.bench_function("keyword_search", |b| {
        b.iter(|| {
            index
                .search("microservices architecture", SearchMode::KeywordOnly, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("hybrid_search", |b| {
        b.iter(|| {
            index
                .search("microservices architecture", SearchMode::Hybrid, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("vector_search", |b| {
        b.iter(|| {
            index
                .search("microservices architecture", SearchMode::VectorOnly, 10)
                .expect("search should succeed")
        });
    });

    group.finish();
}

fn bench_search_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_scaling");
    group.measurement_time(Duration::from_secs(10));

    for count in &[10, 50, 100, 500, 1000] {
        let index = build_index(*count);

        group.bench_with_input(BenchmarkId::new("keyword_search", count), count, |b, _| {
            b.iter(|| {
                index
                    .search("kubernetes deployment", SearchMode::KeywordOnly, 10)
                    .expect("search should succeed")
            });
        });

        group.bench_with_input(BenchmarkId::new("hybrid_search", count), count, |b, _| {
            b.iter(|| {
                index
                    .search("kubernetes deployment", SearchMode::Hybrid, 10)
                    .expect("search should succeed")
            });
        });
    }

    group.finish();
}

fn bench_search_modes(c: &mut Criterion) {
    let index = build_index(200);

    let mut group = c.benchmark_group("search_modes");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("keyword_mode", |b| {
        b.iter(|| {
            index
                .search("API design patterns", SearchMode::KeywordOnly, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("vector_mode", |b| {
        b.iter(|| {
            index
                .search("API design patterns", SearchMode::VectorOnly, 10)
                .expect("search should succeed")
        });
    });

    group.bench_function("hybrid_mode", |b| {
        b.iter(|| {
            index
                .search("API design patterns", SearchMode::Hybrid, 10)
                .expect("search should succeed")
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_100,
    bench_search_1000,
    bench_search_10000,
    bench_search_scaling,
    bench_search_modes,
);
criterion_main!(benches);
