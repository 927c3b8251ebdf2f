//! Query pipeline micro-benchmarks
//!
//! Measures what the compiled-expression cache buys: the same query run
//! through a warm cache, against fresh compilation on every call.

use criterion::{Criterion, criterion_group, criterion_main};
use htmlpath::{CacheConfig, Document, Node, QueryCache, Queryer};

const DEEP_PATH: &str = "/html/body/div/ul/li/a/ancestor::*";

fn fixture() -> Document {
    Document::parse_str(
        r#"<html><body><div><ul>
            <li><a href="/London">London</a></li>
            <li><a href="/Paris">Paris</a></li>
            <li><a href="/Tokyo">Tokyo</a></li>
        </ul></div></body></html>"#,
    )
}

fn benchmark_query_cached(c: &mut Criterion) {
    let doc = fixture();
    let queryer = Queryer::new();

    c.bench_function("query_all_cached", |b| {
        b.iter(|| {
            let root = Node::from_document(&doc);
            queryer
                .query_all(&root, DEEP_PATH)
                .expect("query should succeed")
        })
    });
}

fn benchmark_query_uncached(c: &mut Criterion) {
    let doc = fixture();
    let queryer = Queryer::with_cache(QueryCache::with_config(CacheConfig {
        max_entries: 50,
        enabled: false,
    }));

    c.bench_function("query_all_uncached", |b| {
        b.iter(|| {
            let root = Node::from_document(&doc);
            queryer
                .query_all(&root, DEEP_PATH)
                .expect("query should succeed")
        })
    });
}

fn benchmark_cache_hit(c: &mut Criterion) {
    let cache = QueryCache::new();

    c.bench_function("get_or_compile_hit", |b| {
        b.iter(|| {
            cache
                .get_or_compile(DEEP_PATH)
                .expect("expression should compile")
        })
    });
}

criterion_group!(
    benches,
    benchmark_query_cached,
    benchmark_query_uncached,
    benchmark_cache_hit
);
criterion_main!(benches);
