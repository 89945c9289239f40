//! Concurrent Cache Benchmarks
//!
//! Measures the single-lock concurrent cache across thread counts and
//! read/write mixes, with a `Mutex<LruCache>` baseline for comparison.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recency_cache::{ConcurrentLruCache, LruCache};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::thread;

const CACHE_SIZE: usize = 10_000;
const OPS_PER_THREAD: usize = 1_000;

fn filled_cache() -> Arc<ConcurrentLruCache<usize, usize>> {
    let cache = Arc::new(ConcurrentLruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap()));
    for i in 0..CACHE_SIZE {
        cache.put(i, i);
    }
    cache
}

/// Benchmark concurrent reads of resident keys
fn concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Reads");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    let cache = filled_cache();
    group.bench_function("ConcurrentLRU", |b| {
        b.iter(|| run_concurrent_reads(Arc::clone(&cache), 8, OPS_PER_THREAD));
    });

    let baseline = Arc::new(Mutex::new(LruCache::new(
        NonZeroUsize::new(CACHE_SIZE).unwrap(),
    )));
    for i in 0..CACHE_SIZE {
        baseline.lock().unwrap().put(i, i);
    }
    group.bench_function("Mutex<LruCache>", |b| {
        b.iter(|| {
            let mut handles = Vec::with_capacity(8);
            for t in 0..8 {
                let cache = Arc::clone(&baseline);
                handles.push(thread::spawn(move || {
                    for i in 0..OPS_PER_THREAD {
                        let key = (t * OPS_PER_THREAD + i) % CACHE_SIZE;
                        black_box(cache.lock().unwrap().get(&key).copied());
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

/// Benchmark concurrent inserts of fresh keys, each evicting
fn concurrent_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Writes");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    let cache = filled_cache();
    group.bench_function("ConcurrentLRU", |b| {
        b.iter(|| run_concurrent_writes(Arc::clone(&cache), 8, OPS_PER_THREAD));
    });

    group.finish();
}

/// Benchmark an 80/20 read/write mix across thread counts
fn thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Thread Scaling");

    for num_threads in [1, 2, 4, 8, 16] {
        let cache = filled_cache();
        group.throughput(Throughput::Elements((num_threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| run_concurrent_mixed(Arc::clone(&cache), num_threads, OPS_PER_THREAD));
            },
        );
    }

    group.finish();
}

fn run_concurrent_reads(
    cache: Arc<ConcurrentLruCache<usize, usize>>,
    num_threads: usize,
    ops_per_thread: usize,
) {
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = (t * ops_per_thread + i) % CACHE_SIZE;
                black_box(cache.get(&key));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

fn run_concurrent_writes(
    cache: Arc<ConcurrentLruCache<usize, usize>>,
    num_threads: usize,
    ops_per_thread: usize,
) {
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = CACHE_SIZE + t * ops_per_thread + i;
                black_box(cache.put(key, i));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

fn run_concurrent_mixed(
    cache: Arc<ConcurrentLruCache<usize, usize>>,
    num_threads: usize,
    ops_per_thread: usize,
) {
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = (t * ops_per_thread + i) % (CACHE_SIZE * 2);
                if i % 5 == 0 {
                    cache.put(key, i);
                } else {
                    black_box(cache.get(&key));
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

criterion_group!(benches, concurrent_reads, concurrent_writes, thread_scaling);
criterion_main!(benches);
