//! Criterion benchmarks for full navigation runs and single cycles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fathom_bench::{reference_planner, reference_profile};
use fathom_core::PlannerCapabilities;
use fathom_engine::NavigationLoop;

/// Benchmark: run the 64x64 reference profile from start to finish.
///
/// A seed whose goal is sealed off ends in `NoSolutionFound`; the run is
/// still timed, since the work up to discovery is what matters.
fn bench_reference_run(c: &mut Criterion, name: &str, caps: PlannerCapabilities) {
    let config = reference_profile(42).unwrap();

    c.bench_function(name, |b| {
        b.iter(|| {
            let planner = reference_planner(&config, caps).unwrap();
            let mut nav = NavigationLoop::new(config.clone(), Box::new(planner)).unwrap();
            black_box(nav.run().ok());
        });
    });
}

fn bench_reference_run_full(c: &mut Criterion) {
    bench_reference_run(c, "reference_run_full_invalidation", PlannerCapabilities::FULL);
}

fn bench_reference_run_targeted(c: &mut Criterion) {
    bench_reference_run(
        c,
        "reference_run_targeted_invalidation",
        PlannerCapabilities::TARGETED,
    );
}

/// Benchmark: the first cycle only (fresh search from the start corner).
fn bench_first_cycle(c: &mut Criterion) {
    let config = reference_profile(7).unwrap();

    c.bench_function("reference_first_cycle", |b| {
        b.iter(|| {
            let planner = reference_planner(&config, PlannerCapabilities::FULL).unwrap();
            let mut nav = NavigationLoop::new(config.clone(), Box::new(planner)).unwrap();
            black_box(nav.step().ok());
        });
    });
}

criterion_group!(
    benches,
    bench_reference_run_full,
    bench_reference_run_targeted,
    bench_first_cycle
);
criterion_main!(benches);
