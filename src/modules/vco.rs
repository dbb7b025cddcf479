//! Polyphonic band-limited VCO.
//!
//! Up to 16 voices (one per channel of the V/oct input) in four-lane banks.
//! Pitch, FM, pulse width and output connectivity are read on the control
//! tick (every 4th sample); sync edges are checked every sample.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::approx::exp2_taylor5;
use crate::dsp::divider::ControlDivider;
use crate::dsp::oscillator::{OscillatorBank, WaveformSet, LANES};
use crate::dsp::trigger::SyncDetector;
use crate::io::{Input, Output, RenderCtx};
use crate::modules::{bank_count, polyphony, Module};
use crate::{C4_HZ, MAX_POLYPHONY};

/// Peak output voltage.
pub const OUTPUT_VOLTS: f32 = 5.0;
/// Largest normalised frequency a voice may run at.
pub const MAX_NORMALISED_FREQ: f32 = 0.45;

const BANKS: usize = MAX_POLYPHONY / LANES;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcoParams {
    /// Coarse pitch in volts, 0..10. 4 is middle C.
    pub pitch: f32,
    /// 0.01..0.99
    pub pulse_width: f32,
    /// FM attenuverter, -1..1 (volts of FM per volt of pitch).
    pub fm_amount: f32,
    /// PWM attenuverter, -1..1.
    pub pwm_amount: f32,
}

impl Default for VcoParams {
    fn default() -> Self {
        Self {
            pitch: 4.0,
            pulse_width: 0.5,
            fm_amount: 0.0,
            pwm_amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcoInputs {
    pub voct: Input,
    pub fm: Input,
    pub sync: Input,
    pub pwm: Input,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcoOutputs {
    pub sine: Output,
    pub triangle: Output,
    pub saw: Output,
    pub square: Output,
}

#[derive(Debug, Clone)]
pub struct Vco {
    pub params: VcoParams,
    pub inputs: VcoInputs,
    pub outputs: VcoOutputs,
    banks: [OscillatorBank; BANKS],
    sync: [SyncDetector; MAX_POLYPHONY],
    divider: ControlDivider,
    polyphony: usize,
    wanted: WaveformSet,
}

impl Vco {
    pub fn new() -> Self {
        Self {
            params: VcoParams::default(),
            inputs: VcoInputs::default(),
            outputs: VcoOutputs::default(),
            banks: [OscillatorBank::new(); BANKS],
            sync: [SyncDetector::new(); MAX_POLYPHONY],
            divider: ControlDivider::default(),
            polyphony: 1,
            wanted: WaveformSet::default(),
        }
    }

    /// Disable MinBLEP correction on every voice (naive waveforms).
    pub fn set_band_limited(&mut self, band_limited: bool) {
        for bank in &mut self.banks {
            bank.set_band_limited(band_limited);
        }
    }

    pub fn polyphony(&self) -> usize {
        self.polyphony
    }

    /// Phase of a voice, in [0, 1).
    pub fn phase(&self, voice: usize) -> f32 {
        self.banks
            .get(voice / LANES)
            .map_or(0.0, |bank| bank.phase(voice % LANES))
    }

    fn update_controls(&mut self, ctx: &RenderCtx) {
        self.polyphony = polyphony(self.inputs.voct.channels());
        let base_pitch = self.params.pitch - 4.0 + C4_HZ.log2();

        for voice in 0..self.polyphony {
            let pitch = base_pitch
                + self.inputs.voct.voltage(voice)
                + self.inputs.fm.poly_voltage(voice) * self.params.fm_amount;
            let freq = exp2_taylor5(pitch) * ctx.sample_time;
            let pulse_width = self.params.pulse_width
                + self.inputs.pwm.poly_voltage(voice) / 10.0 * self.params.pwm_amount;

            let bank = &mut self.banks[voice / LANES];
            bank.set_frequency(voice % LANES, freq.clamp(0.0, MAX_NORMALISED_FREQ));
            bank.set_pulse_width(voice % LANES, pulse_width);
        }

        let channels = self.polyphony;
        for output in self.outputs_mut() {
            output.set_channels(channels);
        }

        self.wanted = WaveformSet {
            sine: self.outputs.sine.is_connected(),
            triangle: self.outputs.triangle.is_connected(),
            saw: self.outputs.saw.is_connected(),
            square: self.outputs.square.is_connected(),
        };
    }

    fn outputs_mut(&mut self) -> [&mut Output; 4] {
        let VcoOutputs {
            sine,
            triangle,
            saw,
            square,
        } = &mut self.outputs;
        [sine, triangle, saw, square]
    }
}

impl Default for Vco {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Vco {
    fn process(&mut self, ctx: &RenderCtx) {
        if self.divider.tick() {
            self.update_controls(ctx);
        }

        let sync_patched = self.inputs.sync.is_connected();
        for bank_index in 0..bank_count(self.polyphony) {
            let first = bank_index * LANES;
            let active = (self.polyphony - first).min(LANES);

            let mut sync = [false; LANES];
            if sync_patched {
                for (lane, edge) in sync.iter_mut().enumerate().take(active) {
                    let voice = first + lane;
                    *edge = self.sync[voice].process(self.inputs.sync.poly_voltage(voice));
                }
            }

            let out = self.banks[bank_index].process(active, sync, self.wanted);

            for lane in 0..active {
                let voice = first + lane;
                if self.wanted.sine {
                    self.outputs.sine.set_voltage(voice, out.sine[lane] * OUTPUT_VOLTS);
                }
                if self.wanted.triangle {
                    self.outputs
                        .triangle
                        .set_voltage(voice, out.triangle[lane] * OUTPUT_VOLTS);
                }
                if self.wanted.saw {
                    self.outputs.saw.set_voltage(voice, out.saw[lane] * OUTPUT_VOLTS);
                }
                if self.wanted.square {
                    self.outputs.square.set_voltage(voice, out.square[lane] * OUTPUT_VOLTS);
                }
            }
        }
    }

    fn reset(&mut self) {
        for bank in &mut self.banks {
            bank.reset();
        }
        for detector in &mut self.sync {
            detector.reset();
        }
        self.divider.reset();
        self.polyphony = 1;
    }
}
