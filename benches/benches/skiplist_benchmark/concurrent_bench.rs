use std::{
    hint::black_box,
    sync::{Arc, Barrier},
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use skipmap::ConcurrentSkipList;

fn make_keys(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}

/// Запускает `num_threads` потоков, синхронно стартующих на барьере.
fn run_threads<F>(
    num_threads: usize,
    work: F,
) where
    F: Fn(usize) + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(num_threads));
    let work = Arc::new(work);
    let mut handles = vec![];

    for tid in 0..num_threads {
        let barrier = Arc::clone(&barrier);
        let work = Arc::clone(&work);

        handles.push(thread::spawn(move || {
            barrier.wait();
            work(tid);
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

fn bench_concurrent_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_inserts");

    for &num_threads in &[1, 2, 4, 8, 16] {
        let ops_per_thread = 10_000;
        group.throughput(Throughput::Elements((num_threads * ops_per_thread) as u64));

        let keys: Arc<Vec<Vec<i64>>> = Arc::new(
            (0..num_threads)
                .map(|tid| make_keys(ops_per_thread, (tid as u64) * 42))
                .collect(),
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let list = ConcurrentSkipList::new();
                    let shared = list.clone();
                    let keys = Arc::clone(&keys);

                    run_threads(num_threads, move |tid| {
                        for &key in &keys[tid] {
                            shared.insert(key, key);
                        }
                    });

                    black_box(list.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    // Подготовка: заполняем список
    let list = ConcurrentSkipList::new();
    let keys = Arc::new(make_keys(10_000, 123));
    for key in keys.iter() {
        list.insert(*key, *key);
    }

    for &num_threads in &[1, 2, 4, 8, 16] {
        group.throughput(Throughput::Elements((num_threads * keys.len()) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let list = list.clone();
                    let keys = Arc::clone(&keys);

                    run_threads(num_threads, move |_| {
                        for key in keys.iter() {
                            black_box(list.get(key));
                        }
                    });
                })
            },
        );
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");
    let num_threads = 8;
    let ops_per_thread = 5_000;

    for &read_percentage in &[50u32, 80, 95, 99] {
        group.throughput(Throughput::Elements((num_threads * ops_per_thread) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{read_percentage}%reads")),
            &read_percentage,
            |b, &read_pct| {
                b.iter(|| {
                    let list = ConcurrentSkipList::new();
                    // Предварительно заполняем
                    for i in 0..1000i64 {
                        list.insert(i, i);
                    }

                    let shared = list.clone();
                    run_threads(num_threads, move |tid| {
                        let mut rng = SmallRng::seed_from_u64(tid as u64);
                        for _ in 0..ops_per_thread {
                            let key = rng.gen_range(0..1000i64);
                            if rng.gen_range(0..100) < read_pct {
                                black_box(shared.get(&key));
                            } else if rng.gen_bool(0.5) {
                                shared.insert(key, key);
                            } else {
                                shared.remove(&key);
                            }
                        }
                    });

                    black_box(list.snapshot_and_reset())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_concurrent_inserts,
    bench_concurrent_reads,
    bench_mixed_workload
);
criterion_main!(benches);
