//! Benchmarks for tanh-sinh quadrature.
//!
//! Includes:
//! - Abscissa table compilation
//! - Integration of a smooth and an endpoint-singular integrand
//! - An improper integral

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use precisa::prelude::*;

const PRECISIONS: [u32; 3] = [64, 128, 256];

/// Benchmark building the abscissa table.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    group.sample_size(20);

    for precision in PRECISIONS {
        group.bench_with_input(BenchmarkId::from_parameter(precision), &precision, |b, &p| {
            b.iter(|| {
                let mut engine = TanhSinh::new(p);
                engine.compile().unwrap();
                black_box(engine.table().map(|t| t.len()));
            });
        });
    }

    group.finish();
}

/// Benchmark integrating exp(x) over [0, 1] with a compiled table.
fn bench_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_exp");

    for precision in PRECISIONS {
        let mut engine = TanhSinh::new(precision);
        engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
            Float::op_exp(out, x);
        });
        engine.set_bounds(0.0, 1.0);
        engine.compile().unwrap();

        group.bench_function(BenchmarkId::from_parameter(precision), |b| {
            b.iter(|| {
                engine.integrate().unwrap();
                black_box(engine.integral_approx().to_f64());
            });
        });
    }

    group.finish();
}

/// Benchmark 1 / sqrt(1 - x^2) over [-1, 1], singular at both ends.
fn bench_singular(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_arcsine");

    for precision in PRECISIONS {
        let mut engine = TanhSinh::new(precision);
        engine.set_integrand(|out: &mut Float, _: &Float, c: &Float| {
            out.assign(c);
            out.sub_from_mut(2.0);
            out.mul_mut(c);
            out.rec_sqrt_mut();
        });
        engine.set_bounds(-1.0, 1.0);
        engine.compile().unwrap();

        group.bench_function(BenchmarkId::from_parameter(precision), |b| {
            b.iter(|| {
                engine.integrate().unwrap();
                black_box(engine.integrand_call_count());
            });
        });
    }

    group.finish();
}

/// Benchmark the Gaussian over the whole real line.
fn bench_improper(c: &mut Criterion) {
    let mut engine = TanhSinh::new(128);
    engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
        Float::op_sqr(out, x);
        out.neg_mut();
        out.exp_mut();
    });
    engine.set_bounds(f64::NEG_INFINITY, f64::INFINITY);
    engine.compile().unwrap();

    c.bench_function("integrate_gaussian_128", |b| {
        b.iter(|| {
            engine.integrate().unwrap();
            black_box(engine.integral_approx().to_f64());
        });
    });
}

criterion_group!(benches, bench_compile, bench_smooth, bench_singular, bench_improper);
criterion_main!(benches);
