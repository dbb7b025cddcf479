//! Benchmarks for the IIR and FIR filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::dsp::biquad::Biquad;
use modsynth_dsp::dsp::butterworth::ButterworthCascade;
use modsynth_dsp::dsp::fir::Fir;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        let mut biquad = Biquad::new();
        biquad.set_low_pass(1_000.0 / 48_000.0);
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = biquad.process(black_box(x));
                }
            })
        });

        let mut cascade = ButterworthCascade::new();
        cascade.set_low_pass(1_000.0 / 48_000.0);
        group.bench_with_input(BenchmarkId::new("butterworth", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = cascade.process(black_box(x));
                }
            })
        });

        let mut resonant = ButterworthCascade::new();
        resonant.set_low_pass(1_000.0 / 48_000.0);
        resonant.set_resonance(1_000.0 / 48_000.0, 0.7);
        group.bench_with_input(BenchmarkId::new("butterworth_resonant", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = resonant.process(black_box(x));
                }
            })
        });

        let mut fir: Fir = Fir::new();
        fir.set_low_pass(1_000.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("fir_64", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = fir.process(black_box(x));
                }
            })
        });

        let mut long_fir: Fir<256> = Fir::new();
        long_fir.set_low_pass(1_000.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("fir_256", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = long_fir.process(black_box(x));
                }
            })
        });
    }

    // Kernel design, paid whenever the cutoff moves
    let mut fir: Fir = Fir::new();
    group.bench_function("fir_64_design", |b| {
        b.iter(|| fir.set_low_pass(black_box(1_000.0), 48_000.0))
    });

    group.finish();
}
