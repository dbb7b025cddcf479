//! Benchmarks for the noise generator and wavetable reads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::dsp::noise::NoiseGenerator;
use modsynth_dsp::dsp::wavetable::Wavetable;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        let mut noise = NoiseGenerator::new();
        group.bench_with_input(BenchmarkId::new("white_and_red", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    *sample = black_box(noise.next_sample()) + noise.red();
                }
            })
        });

        let table = Wavetable::ramp();
        let advance = 261.626 / 48_000.0;
        group.bench_with_input(BenchmarkId::new("wavetable_read", size), &size, |b, _| {
            b.iter(|| {
                let mut phase = 0.0f32;
                for sample in output.iter_mut() {
                    phase += advance;
                    phase -= phase.floor();
                    *sample = table.read(black_box(phase));
                }
            })
        });
    }

    group.finish();
}
