//! # Store Benchmarks
//!
//! Performance benchmarks for triplex-core store and graph operations.
//!
//! Run with: `cargo bench -p triplex-core`

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use triplex_core::formats::CanonicalGraph;
use triplex_core::{
    Collection, Graph, GraphOps, MemoryStore, Store, Term, Triple, TriplePattern, store_to_bytes,
};

fn iri(i: usize) -> Term {
    Term::iri(format!("http://example.org/n{i}"))
}

/// Chain n0 -> n1 -> ... with a handful of predicates.
fn create_chain_store(size: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    let context = Term::iri("http://example.org/ctx");
    for i in 0..size {
        let predicate = Term::iri(format!("http://example.org/p{}", i % 4));
        store
            .add(&Triple::new(iri(i), predicate, iri(i + 1)), &context, false)
            .expect("add");
    }
    store
}

fn create_chain_graph(size: usize) -> Graph {
    let graph = Graph::memory();
    let next = Term::iri("http://example.org/next");
    for i in 0..size {
        graph
            .add(Triple::new(iri(i), next.clone(), iri(i + 1)))
            .expect("add");
    }
    graph
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_add");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_chain_store(size)));
        });
    }

    group.finish();
}

fn bench_pattern_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_scan");

    for size in [1000, 10000].iter() {
        let store = create_chain_store(*size);
        let by_subject = TriplePattern::new(Some(iri(size / 2)), None, None);
        let by_predicate =
            TriplePattern::new(None, Some(Term::iri("http://example.org/p1")), None);

        group.bench_with_input(BenchmarkId::new("subject", size), size, |b, _| {
            b.iter(|| black_box(store.triples(&by_subject, None).expect("query").count()));
        });
        group.bench_with_input(BenchmarkId::new("predicate", size), size, |b, _| {
            b.iter(|| black_box(store.triples(&by_predicate, None).expect("query").count()));
        });
    }

    group.finish();
}

fn bench_remove_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_context");

    for size in [1000, 10000].iter() {
        let context = Term::iri("http://example.org/ctx");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || create_chain_store(size),
                |mut store| {
                    store
                        .remove(&TriplePattern::any(), Some(&context))
                        .expect("remove");
                    black_box(store)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_transitive_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitive_objects");

    for size in [100, 1000].iter() {
        let graph = create_chain_graph(*size);
        let next = Term::iri("http://example.org/next");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(graph.transitive_objects(&iri(0), &next).expect("walk")));
        });
    }

    group.finish();
}

fn bench_collection_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_append");

    for size in [10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let graph = Graph::memory();
                let list = Collection::new(&graph, Term::fresh_blank());
                for i in 0..size {
                    list.append(iri(i)).expect("append");
                }
                black_box(graph.len().expect("len"))
            });
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for size in [1000, 10000].iter() {
        let store = create_chain_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(store_to_bytes(&store)));
        });
    }

    group.finish();
}

fn bench_content_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_hash");

    for size in [100, 1000].iter() {
        let graph = create_chain_graph(*size);
        let triples = graph.triples(&TriplePattern::any()).expect("scan");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(CanonicalGraph::from_triples(&triples).content_hash()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_pattern_scan,
    bench_remove_context,
    bench_transitive_objects,
    bench_collection_append,
    bench_snapshot,
    bench_content_hash,
);

criterion_main!(benches);
