mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use village_layout::prelude::{build_roads, place_buildings, BuildingType, Size};
use village_layout::village::placement::settlement_bounds;

fn bench_placement(c: &mut Criterion, size: Size, buildings: usize) {
    let mut rng = StdRng::seed_from_u64(common::SEEDS[1]);
    let roads = build_roads(Vec2::ZERO, size, 3, &mut rng);
    let bounds = settlement_bounds(Vec2::ZERO, size.radius(), &mut rng);
    let types = vec![BuildingType::House; buildings];

    let mut group = c.benchmark_group(format!("placement/{size}/{buildings}"));
    group.throughput(common::buildings_throughput(buildings));

    group.bench_function("place_buildings", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(common::SEEDS[2]),
            |mut rng| {
                let placed = place_buildings(&types, &roads, &bounds, &[], &mut rng, &mut ());
                black_box(placed.len());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

pub fn placement_benches(c: &mut Criterion) {
    bench_placement(c, Size::Tiny, 15);
    bench_placement(c, Size::Small, 25);
    bench_placement(c, Size::Medium, 40);
    // Saturated: most types exhaust their attempts.
    bench_placement(c, Size::Tiny, 60);
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = placement_benches
}
criterion_main!(benches);
