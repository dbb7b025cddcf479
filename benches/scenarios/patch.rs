//! Benchmark for a complete voice: VCO → VCF → VCA with an ADSR.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modsynth_dsp::io::RenderCtx;
use modsynth_dsp::modules::{Adsr, Module, Vca, Vcf, Vco};

use crate::BLOCK_SIZES;

struct Voice {
    vco: Vco,
    vcf: Vcf,
    adsr: Adsr,
    vca: Vca,
}

impl Voice {
    fn new() -> Self {
        let mut voice = Self {
            vco: Vco::new(),
            vcf: Vcf::new(),
            adsr: Adsr::new(),
            vca: Vca::new(),
        };
        voice.vco.outputs.saw.set_connected(true);
        voice.vcf.outputs.lowpass.set_connected(true);
        voice.vcf.params.resonance = 0.4;
        voice.adsr.outputs.envelope.set_connected(true);
        voice.adsr.inputs.gate.set_mono(10.0);
        voice.vca.outputs.output[0].set_connected(true);
        voice
    }

    fn process(&mut self, ctx: &RenderCtx) -> f32 {
        self.vco.process(ctx);
        self.adsr.process(ctx);
        self.vcf.inputs.input.set_mono(self.vco.outputs.saw.voltage(0));
        self.vcf.process(ctx);
        self.vca.inputs.input[0].set_mono(self.vcf.outputs.lowpass.voltage(0));
        self.vca.inputs.modulation[0].set_mono(self.adsr.outputs.envelope.voltage(0));
        self.vca.process(ctx);
        self.vca.outputs.output[0].voltage(0)
    }
}

pub fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/patch");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut voice = Voice::new();
        group.bench_with_input(BenchmarkId::new("subtractive_voice", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = voice.process(black_box(&ctx));
                }
            })
        });
    }

    group.finish();
}
