use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simplex_deriv::{centered_gradient, gradient, hessian, tressian, Projector};

#[path = "common/mod.rs"]
mod common;
use common::*;

fn bench_projector(c: &mut Criterion) {
    let mut group = c.benchmark_group("projector");
    for n in [2, 10, 50] {
        let s = positive_basis(n);
        group.bench_with_input(BenchmarkId::new("pinv", n), &s, |b, s| {
            b.iter(|| black_box(Projector::new(black_box(s)).unwrap()))
        });
    }
    group.finish();
}

fn bench_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient");
    for n in [2, 10, 50] {
        let x = make_input(n);
        let s = positive_basis(n);

        group.bench_with_input(BenchmarkId::new("forward", n), &x, |b, x| {
            b.iter(|| black_box(gradient(&rosenbrock, black_box(x), &s, 1e-6).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("centered", n), &x, |b, x| {
            b.iter(|| black_box(centered_gradient(&rosenbrock, black_box(x), &s, 1e-5).unwrap()))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("forward_par", n), &x, |b, x| {
            b.iter(|| {
                black_box(simplex_deriv::gradient_par(&rosenbrock, black_box(x), &s, 1e-6).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_hessian(c: &mut Criterion) {
    let mut group = c.benchmark_group("hessian");
    for n in [2, 10, 25] {
        let x = make_input(n);
        let s = positive_basis(n);

        group.bench_with_input(BenchmarkId::new("forward", n), &x, |b, x| {
            b.iter(|| black_box(hessian(&trig_sum, black_box(x), &s, &s, 1e-4).unwrap()))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("forward_par", n), &x, |b, x| {
            b.iter(|| {
                black_box(simplex_deriv::hessian_par(&trig_sum, black_box(x), &s, &s, 1e-4).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_tressian(c: &mut Criterion) {
    let mut group = c.benchmark_group("tressian");
    for n in [2, 5, 10] {
        let x = make_input(n);
        let s = positive_basis(n);
        group.bench_with_input(BenchmarkId::new("forward", n), &x, |b, x| {
            b.iter(|| black_box(tressian(&trig_sum, black_box(x), &s, &s, &s, 1e-2).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projector, bench_gradient, bench_hessian, bench_tressian);
criterion_main!(benches);
