use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simplex_deriv::SimplexEngine;

#[path = "common/mod.rs"]
mod common;
use common::*;

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    for n in [2, 5, 10] {
        let x = make_input(n);
        let s = positive_basis(n);
        let engine = SimplexEngine::new(vec![s.clone(), s.clone(), s], 1e-2).unwrap();

        for order in 1..=3 {
            group.bench_with_input(
                BenchmarkId::new(format!("order{order}"), n),
                &x,
                |b, x| b.iter(|| black_box(engine.derivative(&trig_sum, black_box(x), order).unwrap())),
            );
        }

        group.bench_with_input(BenchmarkId::new("all_layers", n), &x, |b, x| {
            b.iter(|| black_box(engine.derivatives(&trig_sum, black_box(x)).unwrap()))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("all_layers_par", n), &x, |b, x| {
            b.iter(|| black_box(engine.derivatives_par(&trig_sum, black_box(x)).unwrap()))
        });
    }
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_plan");
    for n in [2, 10, 50] {
        let s = positive_basis(n);
        group.bench_with_input(BenchmarkId::new("three_levels", n), &s, |b, s| {
            b.iter(|| {
                black_box(SimplexEngine::new(vec![s.clone(), s.clone(), s.clone()], 1e-2).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine, bench_plan);
criterion_main!(benches);
