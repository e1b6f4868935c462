mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use village_layout::prelude::{generate, Setting, Size, VillageOptions};

fn bench_size(c: &mut Criterion, size: Size, walls: bool) {
    let options = VillageOptions::new(size, Setting::Crossroads).with_walls(walls);
    let name = format!(
        "generate/{}/{}",
        size,
        if walls { "walled" } else { "open" }
    );

    let mut group = c.benchmark_group(name);
    // Preview a run to report throughput in buildings per iteration.
    let preview = generate(common::SEEDS[0], &options).map_or(0, |l| l.buildings.len());
    group.throughput(common::buildings_throughput(preview));

    let mut next = 0usize;
    group.bench_function("generate", |b| {
        b.iter_batched(
            || {
                next = (next + 1) % common::SEEDS.len();
                common::SEEDS[next]
            },
            |seed| {
                let layout = generate(seed, &options);
                black_box(layout.map(|l| l.buildings.len()).ok());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

pub fn generate_benches(c: &mut Criterion) {
    for size in Size::ALL {
        bench_size(c, size, false);
        bench_size(c, size, true);
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = generate_benches
}
criterion_main!(benches);
