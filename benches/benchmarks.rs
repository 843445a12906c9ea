use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shardedmap::{KvMap, ReferenceMap, ShardedMap};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SHARD_COUNTS: [usize; 5] = [1, 4, 16, 32, 64];

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("k{}", i)).collect()
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    let keys = keys(1000);

    group.bench_function("reference", |b| {
        let map = ReferenceMap::new();
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                map.set(key, i);
            }
        });
    });

    for shard_count in SHARD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("sharded", shard_count),
            &shard_count,
            |b, &shard_count| {
                let map = ShardedMap::new(shard_count).unwrap();
                b.iter(|| {
                    for (i, key) in keys.iter().enumerate() {
                        map.set(key, i);
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let keys = keys(1000);

    let reference = ReferenceMap::new();
    let sharded = ShardedMap::new(32).unwrap();
    for (i, key) in keys.iter().enumerate() {
        reference.set(key, i);
        sharded.set(key, i);
    }

    group.bench_function("reference", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(reference.get(key));
            }
        });
    });

    group.bench_function("sharded_32", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(sharded.get(key));
            }
        });
    });

    group.finish();
}

/// Run `threads` workers doing a 70/30 get/set mix over disjoint key ranges.
fn run_mixed<M: KvMap<usize> + 'static>(
    map: Arc<M>,
    threads: usize,
    ops_per_thread: usize,
) -> Duration {
    let start = Instant::now();
    let mut handles = vec![];

    for thread_id in 0..threads {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = format!("t{}_k{}", thread_id, i % 1000);
                if i % 10 < 3 {
                    map.set(&key, i);
                } else {
                    black_box(map.get(&key));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

fn bench_concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_mixed");

    let num_threads = 8;
    let ops_per_thread = 5_000;

    group.bench_function("reference", |b| {
        b.iter_custom(|iters| {
            (0..iters)
                .map(|_| run_mixed(Arc::new(ReferenceMap::new()), num_threads, ops_per_thread))
                .sum()
        });
    });

    for shard_count in SHARD_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("sharded", shard_count),
            &shard_count,
            |b, &shard_count| {
                b.iter_custom(|iters| {
                    (0..iters)
                        .map(|_| {
                            let map = Arc::new(ShardedMap::new(shard_count).unwrap());
                            run_mixed(map, num_threads, ops_per_thread)
                        })
                        .sum()
                });
            },
        );
    }

    group.finish();
}

fn bench_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregates");
    let map = ShardedMap::new(32).unwrap();
    for (i, key) in keys(100_000).iter().enumerate() {
        map.set(key, i);
    }

    group.bench_function("count", |b| b.iter(|| black_box(map.count())));
    group.bench_function("count_fan_out", |b| b.iter(|| black_box(map.count_fan_out())));
    group.bench_function("keys_sequential", |b| {
        b.iter(|| black_box(map.keys_sequential()))
    });
    group.bench_function("keys_fan_out", |b| b.iter(|| black_box(map.keys_fan_out())));

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_concurrent_mixed,
    bench_aggregates
);
criterion_main!(benches);
