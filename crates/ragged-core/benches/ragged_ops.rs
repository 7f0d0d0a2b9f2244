//! Benchmarks for ragged buffer operations.
//!
//! Batches mimic entity observations: a few hundred sequences of
//! 0..64 items with a small feature width.
//!
//! Run with:
//! ```bash
//! cargo bench --bench ragged_ops
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ragged_core::{translate_rotate, Index, RaggedBuffer};
use std::hint::black_box;

/// Deterministic lengths in `0..max_len`.
fn lengths(batch: usize, max_len: usize) -> Vec<usize> {
    (0..batch).map(|i| (i * 7 + 3) % max_len).collect()
}

fn buffer(batch: usize, max_len: usize, features: usize) -> RaggedBuffer<f32> {
    let lengths = lengths(batch, max_len);
    let items: usize = lengths.iter().sum();
    let data = (0..items * features).map(|x| (x % 97) as f32).collect();
    RaggedBuffer::from_parts(data, features, lengths).unwrap()
}

fn singletons(batch: usize, features: usize) -> RaggedBuffer<f32> {
    RaggedBuffer::from_parts(vec![1.5; batch * features], features, vec![1; batch]).unwrap()
}

/// Benchmark broadcast addition against one item per sequence
fn bench_broadcast_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_add");

    for batch in [64, 256, 1024] {
        let lhs = buffer(batch, 64, 8);
        let rhs = singletons(batch, 8);
        group.throughput(Throughput::Elements(lhs.len() as u64));

        group.bench_with_input(BenchmarkId::new("owned", batch), &(&lhs, &rhs), |b, (lhs, rhs)| {
            b.iter(|| black_box(lhs.try_add(*rhs).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("in_place_view", batch), &rhs, |b, rhs| {
            let mut target = lhs.clone();
            b.iter(|| {
                target
                    .view_mut(Index::All, vec![0, 2, 4])
                    .unwrap()
                    .try_sub_assign(&rhs.view(Index::All, vec![1, 3, 5]).unwrap())
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark concatenation along each axis
fn bench_cat(c: &mut Criterion) {
    let mut group = c.benchmark_group("cat");
    let a = buffer(512, 32, 8);
    let b = buffer(512, 48, 8);
    let global = singletons(512, 4);

    group.bench_function("batch", |bench| {
        bench.iter(|| black_box(RaggedBuffer::cat(&[&a, &b], 0).unwrap()));
    });
    group.bench_function("items", |bench| {
        bench.iter(|| black_box(RaggedBuffer::cat(&[&a, &b], 1).unwrap()));
    });
    group.bench_function("features_broadcast", |bench| {
        bench.iter(|| black_box(RaggedBuffer::cat(&[&a, &global], 2).unwrap()));
    });

    group.finish();
}

/// Benchmark deferred item-axis selection and materialisation
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let feats = buffer(512, 64, 16);

    group.bench_function("gather_reverse", |bench| {
        let order: Vec<usize> = (0..feats.size0()).rev().collect();
        bench.iter(|| black_box(feats.gather(&order).unwrap()));
    });
    group.bench_function("stepped_items_materialize", |bench| {
        bench.iter(|| {
            let selection = feats
                .select(Index::All, Index::stepped(0, 32, 2), vec![0, 3, 7])
                .unwrap();
            black_box(selection.materialize())
        });
    });

    group.finish();
}

/// Benchmark pad/pack over bucket identifiers
fn bench_padpack(c: &mut Criterion) {
    let mut group = c.benchmark_group("padpack");

    for items in [1_000usize, 10_000, 100_000] {
        let ids: Vec<i64> = (0..items).map(|i| ((i * 31) % 257) as i64).collect();
        let buffer = RaggedBuffer::from_parts(ids, 1, vec![items]).unwrap();
        group.throughput(Throughput::Elements(items as u64));

        group.bench_with_input(BenchmarkId::from_parameter(items), &buffer, |b, buffer| {
            b.iter(|| black_box(buffer.padpack().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark per-sequence translate and rotate
fn bench_translate_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_rotate");
    let frames = singletons(1024, 4);

    group.bench_function("1024_sequences", |bench| {
        let mut positions = buffer(1024, 64, 6);
        bench.iter(|| {
            translate_rotate(
                &mut positions.view_mut(Index::All, vec![0, 1]).unwrap(),
                &frames.view(Index::All, vec![0, 1]).unwrap(),
                &frames.view(Index::All, vec![2, 3]).unwrap(),
            )
            .unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_broadcast_add,
    bench_cat,
    bench_select,
    bench_padpack,
    bench_translate_rotate
);
criterion_main!(benches);
