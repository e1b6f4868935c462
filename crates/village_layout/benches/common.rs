use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

/// Seeds cycled through by the batched benchmarks.
pub const SEEDS: [u64; 4] = [1, 42, 0xD3AD_B33F, 0xFEED_FACE];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in buildings per iteration.
pub fn buildings_throughput(buildings: usize) -> Throughput {
    Throughput::Elements(buildings.max(1) as u64)
}
