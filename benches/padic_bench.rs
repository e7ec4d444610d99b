//! Benchmarks for p-adic arithmetic and L-function evaluation.
//!
//! Includes:
//! - Zp ring operations and Teichmüller lifting
//! - The p-adic logarithm series
//! - L_p(0, chi) with a cold cache

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use iwasawa::prelude::*;

/// Benchmark Zp multiplication and division across precisions.
fn bench_zp_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("zp_arithmetic");

    for precision in [10usize, 50, 200] {
        let x = Zp::from_i64(7, precision, 123_456).unwrap();
        let y = Zp::from_i64(7, precision, 654_321).unwrap();

        group.bench_with_input(BenchmarkId::new("mul", precision), &precision, |b, _| {
            b.iter(|| black_box(&x * &y));
        });

        group.bench_with_input(BenchmarkId::new("div", precision), &precision, |b, _| {
            b.iter(|| black_box(x.div(&y).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the Teichmüller lift, which iterates Frobenius N times.
fn bench_teichmuller(c: &mut Criterion) {
    let mut group = c.benchmark_group("teichmuller");

    for precision in [10usize, 50, 200] {
        let x = Zp::from_i64(13, precision, 2).unwrap();

        group.bench_with_input(BenchmarkId::new("omega", precision), &precision, |b, _| {
            b.iter(|| black_box(x.teichmuller().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the Mercator series with its raised working precision.
fn bench_padic_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("padic_log");

    for precision in [10usize, 30, 60] {
        let x = Qp::from_i64(7, precision, 8).unwrap();

        group.bench_with_input(BenchmarkId::new("log_1p", precision), &precision, |b, _| {
            b.iter(|| black_box(log(&x).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark L_p(0, chi) for the odd character mod 4 with a cold cache.
fn bench_kubota_leopoldt(c: &mut Criterion) {
    let mut group = c.benchmark_group("kubota_leopoldt");
    group.sample_size(20);

    for precision in [10usize, 20, 40] {
        let chi = DirichletCharacter::with_exponents(4, 5, &[1]).unwrap();

        group.bench_with_input(
            BenchmarkId::new("l_at_zero", precision),
            &precision,
            |b, _| {
                b.iter(|| {
                    clear_cache();
                    black_box(kubota_leopoldt(0, &chi, precision).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_zp_arithmetic,
    bench_teichmuller,
    bench_padic_log,
    bench_kubota_leopoldt
);
criterion_main!(benches);
