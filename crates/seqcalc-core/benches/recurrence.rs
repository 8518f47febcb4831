//! Criterion benchmarks for the recurrence solvers.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use seqcalc_core::companion::CompanionMatrix;
use seqcalc_core::ctl::ComputeCtl;
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::fastdoubling::FastDoubling;
use seqcalc_core::solver::StateSolver;
use seqcalc_core::stepper::LinearUnroll;

fn bench_solvers(c: &mut Criterion) {
    let fib = RecurrenceDefinition::fibonacci();
    let trib = RecurrenceDefinition::tribonacci();
    let ctl = ComputeCtl::unbounded();

    let offsets: Vec<u64> = vec![1_000, 10_000, 100_000];

    let mut group = c.benchmark_group("FastDoubling");
    for &n in &offsets {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| FastDoubling::new().state_at(&fib, n, &ctl).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("CompanionMatrix/order2");
    for &n in &offsets {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| CompanionMatrix::new().state_at(&fib, n, &ctl).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("CompanionMatrix/order3");
    for &n in &offsets {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| CompanionMatrix::new().state_at(&trib, n, &ctl).unwrap());
        });
    }
    group.finish();

    // Linear unrolling is the O(n) baseline; keep its offsets small.
    let mut group = c.benchmark_group("LinearUnroll");
    for &n in &[1_000u64, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| LinearUnroll::new().state_at(&fib, n, &ctl).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
