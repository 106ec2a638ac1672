//! Criterion micro-benchmarks for paged arena and bump arena allocation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use strata_arena::{ArenaConfig, IndexPool, PagedArena, PagedBumpArena};
use strata_test_utils::fixtures::CacheLine;

fn bench_paged_alloc_10k(c: &mut Criterion) {
    c.bench_function("paged_alloc_10k", |b| {
        b.iter(|| {
            let mut arena: PagedArena<u64> = PagedArena::new();
            for _ in 0..10_000 {
                black_box(arena.allocate().unwrap());
            }
            arena
        });
    });
}

fn bench_paged_alloc_small_pages(c: &mut Criterion) {
    let config = ArenaConfig::new(16);
    c.bench_function("paged_alloc_10k_page16", |b| {
        b.iter(|| {
            let mut arena: PagedArena<CacheLine> =
                PagedArena::with_config(config.clone()).unwrap();
            for _ in 0..10_000 {
                black_box(arena.allocate().unwrap());
            }
            arena
        });
    });
}

fn bench_paged_reuse(c: &mut Criterion) {
    c.bench_function("paged_free_then_reuse_1k", |b| {
        b.iter_batched(
            || {
                let mut arena: PagedArena<u64> = PagedArena::new();
                let indices: Vec<_> = (0..1_000)
                    .map(|_| arena.allocate().unwrap().index())
                    .collect();
                for &i in &indices {
                    arena.deallocate(i);
                }
                arena
            },
            |mut arena| {
                for _ in 0..1_000 {
                    black_box(arena.allocate().unwrap());
                }
                arena
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_paged_address_of(c: &mut Criterion) {
    let mut arena: PagedArena<u64> = PagedArena::new();
    for _ in 0..10_000 {
        arena.allocate().unwrap();
    }
    c.bench_function("paged_address_of_10k", |b| {
        b.iter(|| {
            for i in 0..10_000 {
                black_box(arena.address_of(black_box(i)));
            }
        });
    });
}

fn bench_index_pool(c: &mut Criterion) {
    c.bench_function("index_pool_push_pop_10k", |b| {
        let mut pool = IndexPool::new();
        pool.reserve(10_000);
        b.iter(|| {
            for i in 0..10_000 {
                pool.push(i);
            }
            while let Ok(i) = pool.pop() {
                black_box(i);
            }
        });
    });
}

fn bench_bump_alloc(c: &mut Criterion) {
    let mut arena = PagedBumpArena::new(64 * 1024).unwrap();
    c.bench_function("bump_alloc_10k_mixed", |b| {
        b.iter(|| {
            for i in 0..10_000usize {
                let bytes = 8 + (i % 7) * 8;
                black_box(arena.allocate(bytes, 8).unwrap());
            }
            arena.reset();
        });
    });
}

criterion_group!(
    benches,
    bench_paged_alloc_10k,
    bench_paged_alloc_small_pages,
    bench_paged_reuse,
    bench_paged_address_of,
    bench_index_pool,
    bench_bump_alloc
);
criterion_main!(benches);
