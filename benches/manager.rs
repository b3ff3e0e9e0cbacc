use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use lrukit::manager::CacheManager;
use lrukit::policy::lru::LruCore;
use lrukit::traits::CoreCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled_manager(capacity: usize) -> CacheManager<u64, u64> {
    let cache = CacheManager::new(capacity).unwrap();
    for i in 0..capacity as u64 {
        cache.put(i, i).unwrap();
    }
    cache
}

fn bench_core_insert_get(c: &mut Criterion) {
    c.bench_function("core_insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, Arc::new(i));
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), Arc::new(i));
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_manager_put_get(c: &mut Criterion) {
    c.bench_function("manager_put_get", |b| {
        b.iter_batched(
            || filled_manager(1024),
            |cache| {
                for i in 0..1024u64 {
                    cache.put(std::hint::black_box(i + 10_000), i).unwrap();
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_manager_eviction_churn(c: &mut Criterion) {
    c.bench_function("manager_eviction_churn_notified", |b| {
        b.iter_batched(
            || {
                let cache = filled_manager(1024);
                let evictions = Arc::new(AtomicU64::new(0));
                cache
                    .subscribe(move |_, _| {
                        evictions.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                cache
            },
            |cache| {
                for i in 0..4096u64 {
                    cache.put(std::hint::black_box(10_000 + i), i).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_manager_contended(c: &mut Criterion) {
    let threads = 4;
    let ops_per_thread = 2_000;

    c.bench_function("manager_contended_mixed_4t", |b| {
        b.iter_batched(
            || Arc::new(filled_manager(4096)),
            |cache| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            let mut rng = StdRng::seed_from_u64(t);
                            for _ in 0..ops_per_thread {
                                let key = rng.gen_range(0..8192u64);
                                if rng.gen_bool(0.2) {
                                    cache.put(key, key).unwrap();
                                } else {
                                    let _ = std::hint::black_box(cache.peek(&key));
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_core_insert_get,
    bench_manager_put_get,
    bench_manager_eviction_churn,
    bench_manager_contended
);
criterion_main!(benches);
