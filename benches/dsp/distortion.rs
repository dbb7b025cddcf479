//! Benchmarks for the filter drive stage.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::dsp::distortion;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // ±5 V test signal
        let input: Vec<f32> = (0..size)
            .map(|i| 5.0 * (i as f32 * 0.1).sin())
            .collect();
        let mut buffer = input.clone();

        for &drive in &[0.0f32, 0.5, 1.0] {
            group.bench_with_input(
                BenchmarkId::new(format!("drive_{drive}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for (out, &x) in buffer.iter_mut().zip(&input) {
                            *out = distortion::drive_stage(black_box(x), black_box(drive));
                        }
                    })
                },
            );
        }
    }

    group.finish();
}
