//! The live patch: VCO (+ noise) → VCF low-pass → VCA, ADSR on the VCA.

use modsynth_dsp::dsp::oscillator::Waveform;
use modsynth_dsp::io::{note_to_volts, Output, RenderCtx};
use modsynth_dsp::modules::vco::VcoOutputs;
use modsynth_dsp::modules::{Adsr, Module, Noise, Vca, Vcf, Vco};

use crate::ui::state::{ControlMessage, PatchStatus};

/// Volts that map to a full-scale audio sample.
const FULL_SCALE_VOLTS: f32 = 10.0;
const NOISE_LEVELS: [f32; 4] = [0.0, 0.25, 0.5, 1.0];
const LOWEST_NOTE: u8 = 24;
const HIGHEST_NOTE: u8 = 96;
const MIN_CUTOFF_HZ: f32 = 20.0;
const MAX_CUTOFF_HZ: f32 = 20_000.0;

pub struct Patch {
    ctx: RenderCtx,
    vco: Vco,
    vcf: Vcf,
    adsr: Adsr,
    vca: Vca,
    noise: Noise,
    note: u8,
    gate: bool,
    retrigger_pending: bool,
    waveform: Waveform,
    noise_level: usize,
}

impl Patch {
    pub fn new(sample_rate: f32) -> Self {
        let mut patch = Self {
            ctx: RenderCtx::new(sample_rate),
            vco: Vco::new(),
            vcf: Vcf::new(),
            adsr: Adsr::new(),
            vca: Vca::new(),
            noise: Noise::new(),
            note: 60,
            gate: false,
            retrigger_pending: false,
            waveform: Waveform::Saw,
            noise_level: 0,
        };

        patch.adsr.params.attack = 0.3;
        patch.adsr.params.decay = 0.5;
        patch.adsr.params.sustain = 0.6;
        patch.adsr.params.release = 0.45;
        patch.vcf.params.resonance = 0.3;
        patch.vcf.outputs.lowpass.set_connected(true);
        patch.noise.outputs.white.set_connected(true);
        patch.vca.outputs.output[0].set_connected(true);
        patch.adsr.outputs.envelope.set_connected(true);
        oscillator_output(&mut patch.vco.outputs, patch.waveform).set_connected(true);
        patch
    }

    pub fn set_note(&mut self, note: u8) {
        self.note = note.clamp(LOWEST_NOTE, HIGHEST_NOTE);
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.vcf.params.cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
    }

    pub fn apply(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::ToggleGate => self.gate = !self.gate,
            ControlMessage::Retrigger => self.retrigger_pending = true,
            ControlMessage::Transpose(semitones) => {
                let note = (self.note as i16 + semitones as i16).clamp(0, 127) as u8;
                self.set_note(note);
            }
            ControlMessage::ScaleCutoff(factor) => self.set_cutoff(self.vcf.params.cutoff * factor),
            ControlMessage::ToggleFilterMode => self.vcf.mode = self.vcf.mode.toggled(),
            ControlMessage::NextWaveform => {
                oscillator_output(&mut self.vco.outputs, self.waveform).set_connected(false);
                self.waveform = self.waveform.next();
                oscillator_output(&mut self.vco.outputs, self.waveform).set_connected(true);
            }
            ControlMessage::CycleNoise => {
                self.noise_level = (self.noise_level + 1) % NOISE_LEVELS.len();
            }
        }
    }

    /// Run every module once and return the VCA output as an audio sample.
    pub fn next_sample(&mut self) -> f32 {
        let retrigger = std::mem::take(&mut self.retrigger_pending);
        self.vco.inputs.voct.set_mono(note_to_volts(self.note));
        self.adsr.inputs.gate.set_mono(if self.gate { 10.0 } else { 0.0 });
        self.adsr
            .inputs
            .retrigger
            .set_mono(if retrigger { 10.0 } else { 0.0 });

        self.vco.process(&self.ctx);
        self.noise.process(&self.ctx);
        self.adsr.process(&self.ctx);

        let oscillator = oscillator_output(&mut self.vco.outputs, self.waveform).voltage(0);
        let noise = 0.5 * NOISE_LEVELS[self.noise_level] * self.noise.outputs.white.voltage(0);
        self.vcf.inputs.input.set_mono(oscillator + noise);
        self.vcf.process(&self.ctx);

        self.vca.inputs.input[0].set_mono(self.vcf.outputs.lowpass.voltage(0));
        self.vca.inputs.modulation[0].set_mono(self.adsr.outputs.envelope.voltage(0));
        self.vca.process(&self.ctx);

        (self.vca.outputs.output[0].voltage(0) / FULL_SCALE_VOLTS).clamp(-1.0, 1.0)
    }

    pub fn status(&self) -> PatchStatus {
        PatchStatus {
            note: self.note,
            gate: self.gate,
            envelope: self.adsr.outputs.envelope.voltage(0),
            cutoff_hz: self.vcf.cutoff_hz(&self.ctx),
            mode: self.vcf.mode,
            waveform: self.waveform,
            noise_mix: NOISE_LEVELS[self.noise_level],
            lights: self.adsr.lights(),
            meter: self.vca.meter(0),
            sample_rate: self.ctx.sample_rate,
        }
    }
}

fn oscillator_output(outputs: &mut VcoOutputs, waveform: Waveform) -> &mut Output {
    match waveform {
        Waveform::Sine => &mut outputs.sine,
        Waveform::Triangle => &mut outputs.triangle,
        Waveform::Saw => &mut outputs.saw,
        Waveform::Square => &mut outputs.square,
    }
}
