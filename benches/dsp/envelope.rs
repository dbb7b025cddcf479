//! Benchmarks for the envelope state machine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::dsp::envelope::{EnvelopeShape, EnvelopeVoice};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let dt = 1.0 / 48_000.0;
    let shape = EnvelopeShape {
        attack: 0.3,
        decay: 0.5,
        sustain: 0.6,
        release: 0.5,
    };

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        // Gate held: attack then decay segments
        let mut voice = EnvelopeVoice::new();
        group.bench_with_input(BenchmarkId::new("gated", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    *sample = voice.process(black_box(10.0), 0.0, &shape, dt);
                }
            })
        });

        // Gate toggling every half block: every segment gets exercised
        let mut voice = EnvelopeVoice::new();
        group.bench_with_input(BenchmarkId::new("toggling", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in output.iter_mut().enumerate() {
                    let gate = if i < size / 2 { 10.0 } else { 0.0 };
                    *sample = voice.process(black_box(gate), 0.0, &shape, dt);
                }
            })
        });
    }

    group.finish();
}
