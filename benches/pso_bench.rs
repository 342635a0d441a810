//! Criterion benchmarks for the PSO engine.
//!
//! Uses randomly generated locations with fixed seeds so runs are
//! comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_pso_tsp::geometry::{generate_locations, DistanceTable, LocationBounds};
use u_pso_tsp::pso::{PositionalSwap, PsoConfig, PsoRunner, SegmentReversal};
use u_pso_tsp::trace::NullSink;

fn table(n: usize) -> DistanceTable {
    let mut rng = StdRng::seed_from_u64(42);
    let locations = generate_locations(n, &LocationBounds::default(), &mut rng);
    DistanceTable::from_locations(&locations).expect("generated locations are valid")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_distance_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_table");

    for &n in &[40usize, 200, 1000] {
        let mut rng = StdRng::seed_from_u64(1);
        let locations = generate_locations(n, &LocationBounds::default(), &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &locations, |b, locs| {
            b.iter(|| black_box(DistanceTable::from_locations(black_box(locs))))
        });
    }
    group.finish();
}

fn bench_pso_positional_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso_positional_swap");
    group.sample_size(10);

    for (n, particles, iterations) in [(40usize, 4usize, 5usize), (40, 32, 100), (200, 64, 50)] {
        let table = table(n);
        let config = PsoConfig::default()
            .with_particle_count(particles)
            .with_iterations(iterations)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_i{}", n, particles, iterations), n),
            &(table, config),
            |b, (t, c)| {
                b.iter(|| {
                    let result = PsoRunner::run_with_encoding(
                        black_box(t),
                        black_box(c),
                        &PositionalSwap,
                        &NullSink,
                    );
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_pso_segment_reversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso_segment_reversal");
    group.sample_size(10);

    for &n in &[40usize, 200] {
        let table = table(n);
        let config = PsoConfig::default()
            .with_particle_count(32)
            .with_iterations(50)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(table, config), |b, (t, c)| {
            b.iter(|| {
                let result = PsoRunner::run_with_encoding(
                    black_box(t),
                    black_box(c),
                    &SegmentReversal,
                    &NullSink,
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_distance_table,
    bench_pso_positional_swap,
    bench_pso_segment_reversal
);
criterion_main!(benches);
