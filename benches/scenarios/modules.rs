//! Benchmarks for individual modules at one and sixteen voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::io::RenderCtx;
use modsynth_dsp::modules::{Adsr, FilterMode, Module, Vcf, Vco, WaveCrafter};

use crate::BLOCK_SIZES;

fn vco(voices: usize) -> Vco {
    let mut vco = Vco::new();
    let pitches: Vec<f32> = (0..voices).map(|v| v as f32 / 12.0).collect();
    vco.inputs.voct.set_poly(&pitches);
    vco.outputs.saw.set_connected(true);
    vco.outputs.square.set_connected(true);
    vco
}

pub fn bench_modules(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/modules");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        for &voices in &[1usize, 16] {
            let mut osc = vco(voices);
            group.bench_with_input(
                BenchmarkId::new(format!("vco_{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for _ in 0..size {
                            osc.process(black_box(&ctx));
                        }
                    })
                },
            );

            let mut adsr = Adsr::new();
            adsr.inputs.gate.set_poly(&vec![10.0; voices]);
            adsr.outputs.envelope.set_connected(true);
            group.bench_with_input(
                BenchmarkId::new(format!("adsr_{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for _ in 0..size {
                            adsr.process(black_box(&ctx));
                        }
                    })
                },
            );
        }

        let mut crafter = WaveCrafter::new();
        crafter.outputs.output.set_connected(true);
        group.bench_with_input(BenchmarkId::new("wavecrafter", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..size {
                    crafter.process(black_box(&ctx));
                }
            })
        });

        // VCF with all three outputs patched and a moving cutoff CV
        for (name, mode) in [("vcf_iir", FilterMode::Iir), ("vcf_fir", FilterMode::Fir)] {
            let mut vcf: Vcf = Vcf::new();
            vcf.mode = mode;
            vcf.params.cutoff_mod = 0.5;
            vcf.outputs.lowpass.set_connected(true);
            vcf.outputs.bandpass.set_connected(true);
            vcf.outputs.highpass.set_connected(true);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for i in 0..size {
                        vcf.inputs.input.set_mono((i as f32 * 0.05).sin() * 5.0);
                        vcf.inputs.cutoff_mod.set_mono((i as f32 * 0.001).sin());
                        vcf.process(black_box(&ctx));
                    }
                })
            });
        }
    }

    group.finish();
}
