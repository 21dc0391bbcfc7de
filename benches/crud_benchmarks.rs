use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rank_tree::RankTree;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter(|| {
            let mut tree = RankTree::with_capacity(N);
            for &key in &keys {
                tree.insert(key);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        });
    });

    group.finish();
}

fn bench_find_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RankTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("find_random");

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.find(key));
            }
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.contains(key));
            }
        });
    });

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RankTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("rank");

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.rank(key));
            }
        });
    });

    // BTreeSet has no order-statistic query; counting a range scan is the
    // O(n) alternative the augmentation replaces.
    group.bench_function(BenchmarkId::new("BTreeSet_scan", N), |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.range(..=*key).count());
            }
        });
    });

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RankTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();

    // A window around the median, roughly 1% of the key space.
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    let low = sorted[N / 2];
    let high = sorted[N / 2 + N / 100];

    let mut group = c.benchmark_group("range");

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter(|| black_box(tree.range(&low, &high)));
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| black_box(set.range(low..=high).collect::<Vec<_>>()));
    });

    group.finish();
}

criterion_group!(benches, bench_insert_random, bench_find_random, bench_rank, bench_range);
criterion_main!(benches);
