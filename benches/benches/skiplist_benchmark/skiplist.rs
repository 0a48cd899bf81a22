use std::{collections::BTreeMap, hint::black_box};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use skipmap::{SkipList, SkipListConfig};

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn make_sample_keys(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut v = Vec::with_capacity(n);

    for _ in 0..n {
        v.push(rng.gen_range(i64::MIN..=i64::MAX));
    }

    v
}

fn seeded_list(seed: u64) -> SkipList<i64, i64, SmallRng> {
    SkipList::with_rng(SkipListConfig::default(), SmallRng::seed_from_u64(seed))
        .expect("default config is valid")
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_insert");
    for &n in &SIZES {
        let keys = make_sample_keys(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| {
                // Каждый прогон новый список
                let mut sl = seeded_list(1);
                for k in keys.iter() {
                    sl.insert(*k, *k);
                }
                black_box(sl);
            })
        });
    }
    group.finish();
}

fn bench_get_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_get");
    for &n in &SIZES {
        // Подготовка: заполнить список один раз
        let mut sl = seeded_list(2);
        let keys = make_sample_keys(n, 123);
        for k in &keys {
            sl.insert(*k, *k);
        }

        let misses = make_sample_keys(n, 9999);

        group.bench_with_input(BenchmarkId::new("get_hit", n), &n, |b, &_n| {
            b.iter(|| {
                for k in keys.iter().take(1000) {
                    black_box(sl.get(k));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("get_miss", n), &n, |b, &_n| {
            b.iter(|| {
                for k in misses.iter().take(1000) {
                    black_box(sl.get(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_remove");
    for &n in &SIZES {
        let keys = make_sample_keys(n, 777);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| {
                let mut sl = seeded_list(3);
                for k in &keys {
                    sl.insert(*k, *k);
                }
                // теперь удаляем все
                for k in &keys {
                    black_box(sl.remove(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_probability(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_probability");
    let keys = make_sample_keys(10_000, 2026);

    for &p in &[0.25, 0.5, 0.75] {
        let config = SkipListConfig::default().with_probability(p);
        group.bench_with_input(BenchmarkId::from_parameter(p), &config, |b, &config| {
            b.iter(|| {
                let mut sl = SkipList::with_rng(config, SmallRng::seed_from_u64(4))
                    .expect("probability is in range");
                for k in &keys {
                    sl.insert(*k, ());
                }
                black_box(sl.current_level());
            })
        });
    }
    group.finish();
}

fn bench_btreemap_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("btreemap_insert");
    for &n in &SIZES {
        let keys = make_sample_keys(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for k in &keys {
                    map.insert(*k, *k);
                }
                black_box(map);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_get_hit_miss,
    bench_remove,
    bench_probability,
    bench_btreemap_baseline
);
criterion_main!(benches);
