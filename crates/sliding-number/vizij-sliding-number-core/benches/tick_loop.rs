//! Benchmarks for digit math and the tick loop.
//!
//! Run with: `cargo bench --package vizij-sliding-number-core --bench tick_loop`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use vizij_sliding_number_core::{compose, decompose, interpolate_digits, Options, SlidingNumber};

fn bench_digit_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("digit_math");
    for (value, dp) in [(42.0, 0u32), (1234567.0, 0), (98765.4321, 4)] {
        group.bench_with_input(
            BenchmarkId::new("decompose_interpolate_compose", format!("{value}@{dp}")),
            &(value, dp),
            |b, &(value, dp)| {
                let end = decompose(0.0, dp).unwrap();
                b.iter(|| {
                    let start = decompose(black_box(value), dp).unwrap();
                    let mid = interpolate_digits(&start, &end, black_box(0.5));
                    black_box(compose(&mid, dp))
                })
            },
        );
    }
    group.finish();
}

fn bench_full_transition(c: &mut Criterion) {
    c.bench_function("transition_9_ticks_4_subscribers", |b| {
        let store = SlidingNumber::new(0.0, Options::new().with_duration(90.0)).unwrap();
        let _subs: Vec<_> = (0..4)
            .map(|_| store.subscribe(|v| {
                black_box(v);
            }))
            .collect();
        let mut target = 0.0;
        b.iter(|| {
            target += 1111.0;
            store.set(black_box(target)).unwrap();
            black_box(store.advance(90.0).unwrap())
        })
    });
}

criterion_group!(benches, bench_digit_math, bench_full_transition);
criterion_main!(benches);
