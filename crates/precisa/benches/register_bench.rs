//! Benchmarks for scratch registers.
//!
//! Includes:
//! - Pooled expression chains against freshly allocated temporaries
//! - Adopt/release churn

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use precisa::prelude::*;

/// Benchmark a Horner-style chain `((x + 1) * x + 1) * x ...`.
fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("horner_chain");

    for precision in [64, 256, 1024] {
        let x = Float::with_val(precision, 0.75);

        group.bench_with_input(BenchmarkId::new("pooled", precision), &precision, |b, &p| {
            let mut pool = RegisterPool::new(p);
            b.iter(|| {
                let mut acc = pool.adopt_value(1.0);
                for _ in 0..32 {
                    acc = pool.mul(acc, &x);
                    acc = pool.add(acc, 1.0);
                }
                black_box(pool.get(&acc).to_f64());
                pool.release(acc);
            });
        });

        group.bench_with_input(BenchmarkId::new("owned", precision), &precision, |b, &p| {
            b.iter(|| {
                let mut acc = Float::with_val(p, 1.0);
                for _ in 0..32 {
                    let mut next = Float::with_precision(p);
                    Float::op_mul(&mut next, &acc, &x);
                    next.add_mut(1.0);
                    acc = next;
                }
                black_box(acc.to_f64());
            });
        });
    }

    group.finish();
}

/// Benchmark adopting and releasing a stack of registers.
fn bench_churn(c: &mut Criterion) {
    let mut pool = RegisterPool::new(128);

    c.bench_function("adopt_release_16", |b| {
        b.iter(|| {
            let registers: Vec<Register> = (0..16).map(|i| pool.adopt_value(f64::from(i))).collect();
            for register in registers.into_iter().rev() {
                pool.release(register);
            }
            black_box(pool.active_count());
        });
    });
}

criterion_group!(benches, bench_chain, bench_churn);
criterion_main!(benches);
