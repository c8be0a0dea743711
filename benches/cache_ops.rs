//! Benchmark suite for upcache cache operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::{sync::Arc, thread};
use upcache::sync::Cache;

/// Benchmark the miss path, where every key is generated and inserted.
///
/// Tests cache sizes: 100, 1,000, and 10,000 entries.
fn get_or_add_miss_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_or_add_miss");

    for size in [100u64, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let cache: Cache<u64, String> = Cache::new();
                for i in 0..size {
                    cache.get_or_add(black_box(i), || format!("value-{}", i));
                }
            });
        });
    }
    group.finish();
}

/// Benchmark the hit path on a pre-populated cache, which takes only the shared
/// lock.
fn get_or_add_hit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_or_add_hit");

    for size in [100u64, 1000, 10000].iter() {
        let cache: Cache<u64, Arc<String>> = Cache::new();
        for i in 0..*size {
            cache.insert(i, Arc::new(format!("value-{}", i)));
        }

        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    let _ = cache.get_or_add(black_box(i), || unreachable!());
                }
            });
        });
    }
    group.finish();
}

/// Benchmark hits from several threads at once.
///
/// Readers share the lock, so throughput should scale with the thread count.
fn concurrent_hit_benchmark(c: &mut Criterion) {
    const KEYS: u64 = 1_000;

    let mut group = c.benchmark_group("concurrent_hit");
    let cache: Cache<u64, u64> = Cache::new();
    for i in 0..KEYS {
        cache.insert(i, i);
    }

    for threads in [1u64, 2, 4, 8].iter() {
        group.throughput(Throughput::Elements(KEYS * threads));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                b.iter(|| {
                    thread::scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                for i in 0..KEYS {
                                    black_box(cache.get_or_add(i, || unreachable!()));
                                }
                            });
                        }
                    });
                });
            },
        );
    }
    group.finish();
}

/// Benchmark in-place updates of a small set of hot keys.
fn create_or_change_state_benchmark(c: &mut Criterion) {
    let cache: Cache<u8, u64> = Cache::new();

    c.bench_function("create_or_change_state", |b| {
        b.iter(|| {
            for key in 0..16u8 {
                cache.create_or_change_state(black_box(key), || 0, |n| *n += 1);
            }
        });
    });
}

criterion_group!(
    benches,
    get_or_add_miss_benchmark,
    get_or_add_hit_benchmark,
    concurrent_hit_benchmark,
    create_or_change_state_benchmark
);
criterion_main!(benches);
