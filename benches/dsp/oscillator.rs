//! Benchmarks for the four-lane oscillator bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::dsp::oscillator::{OscillatorBank, Waveform, WaveformSet, LANES};

use crate::BLOCK_SIZES;

fn bank(band_limited: bool) -> OscillatorBank {
    let mut bank = OscillatorBank::new();
    bank.set_band_limited(band_limited);
    for lane in 0..LANES {
        // A2 and up, different enough that edges land on different samples
        bank.set_frequency(lane, (110.0 * (lane + 1) as f32) / 48_000.0);
    }
    bank
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let no_sync = [false; LANES];

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        // Naive waveforms: the cost floor
        let mut naive = bank(false);
        group.bench_with_input(BenchmarkId::new("naive_all", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    let out = naive.process(LANES, no_sync, black_box(WaveformSet::ALL));
                    *sample = out.saw[0] + out.square[0];
                }
            })
        });

        // MinBLEP correction on saw and square
        let mut corrected = bank(true);
        group.bench_with_input(BenchmarkId::new("minblep_all", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    let out = corrected.process(LANES, no_sync, black_box(WaveformSet::ALL));
                    *sample = out.saw[0] + out.square[0];
                }
            })
        });

        // Only the saw output patched
        let mut saw = bank(true);
        let wanted = WaveformSet::only(Waveform::Saw);
        group.bench_with_input(BenchmarkId::new("minblep_saw", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    *sample = saw.process(LANES, no_sync, black_box(wanted)).saw[0];
                }
            })
        });
    }

    group.finish();
}
