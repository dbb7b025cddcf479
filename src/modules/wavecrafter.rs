//! Polyphonic oscillator reading a user-drawn wavetable.
//!
//! Pitch works like the VCO (1V/octave, 4 V knob = middle C, controls
//! recomputed every 4th sample). Each voice reads the table at its phase with
//! 4-point interpolation; the table's [0, 1] range maps to ±5 V.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::approx::{exp2_taylor5, rescale};
use crate::dsp::divider::ControlDivider;
use crate::dsp::wavetable::Wavetable;
use crate::io::{Input, Output, RenderCtx};
use crate::modules::{polyphony, Module};
use crate::{C4_HZ, MAX_POLYPHONY};

pub const MIN_ADVANCE: f32 = 1e-6;
pub const MAX_ADVANCE: f32 = 0.35;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveCrafterParams {
    /// Coarse pitch in volts, 0..10. 4 is middle C.
    pub pitch: f32,
    /// 0..1
    pub fm_amount: f32,
}

impl Default for WaveCrafterParams {
    fn default() -> Self {
        Self {
            pitch: 4.0,
            fm_amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaveCrafterInputs {
    pub voct: Input,
    pub fm: Input,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaveCrafterOutputs {
    pub output: Output,
}

#[derive(Debug, Clone)]
pub struct WaveCrafter {
    pub params: WaveCrafterParams,
    pub inputs: WaveCrafterInputs,
    pub outputs: WaveCrafterOutputs,
    table: Wavetable,
    phase: [f32; MAX_POLYPHONY],
    advance: [f32; MAX_POLYPHONY],
    divider: ControlDivider,
    polyphony: usize,
}

impl WaveCrafter {
    pub fn new() -> Self {
        Self {
            params: WaveCrafterParams::default(),
            inputs: WaveCrafterInputs::default(),
            outputs: WaveCrafterOutputs::default(),
            table: Wavetable::ramp(),
            phase: [0.0; MAX_POLYPHONY],
            advance: [0.0; MAX_POLYPHONY],
            divider: ControlDivider::default(),
            polyphony: 1,
        }
    }

    pub fn table(&self) -> &Wavetable {
        &self.table
    }

    /// Resizing allocates; do it outside the audio callback.
    pub fn table_mut(&mut self) -> &mut Wavetable {
        &mut self.table
    }

    pub fn polyphony(&self) -> usize {
        self.polyphony
    }

    pub fn phase(&self, voice: usize) -> f32 {
        self.phase.get(voice).copied().unwrap_or(0.0)
    }

    fn update_controls(&mut self, ctx: &RenderCtx) {
        self.polyphony = polyphony(self.inputs.voct.channels());
        self.outputs.output.set_channels(self.polyphony);

        let base_pitch = self.params.pitch - 4.0 + C4_HZ.log2();
        for voice in 0..self.polyphony {
            let pitch = base_pitch
                + self.inputs.voct.voltage(voice)
                + self.inputs.fm.poly_voltage(voice) * self.params.fm_amount;
            let advance = exp2_taylor5(pitch) * ctx.sample_time;
            self.advance[voice] = if advance.is_nan() {
                MIN_ADVANCE
            } else {
                advance.clamp(MIN_ADVANCE, MAX_ADVANCE)
            };
        }
    }
}

impl Default for WaveCrafter {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for WaveCrafter {
    fn process(&mut self, ctx: &RenderCtx) {
        if self.divider.tick() {
            self.update_controls(ctx);
        }

        let connected = self.outputs.output.is_connected();
        for voice in 0..self.polyphony {
            let mut phase = self.phase[voice] + self.advance[voice];
            phase -= phase.floor();
            self.phase[voice] = phase;

            if connected {
                let volts = rescale(self.table.read(phase), 0.0, 1.0, -5.0, 5.0);
                self.outputs.output.set_voltage(voice, volts);
            }
        }
    }

    /// Restores the default ramp along with the voice state.
    fn reset(&mut self) {
        self.table = Wavetable::ramp();
        self.phase = [0.0; MAX_POLYPHONY];
        self.divider.reset();
        self.polyphony = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patched() -> WaveCrafter {
        let mut crafter = WaveCrafter::new();
        crafter.outputs.output.set_connected(true);
        crafter
    }

    #[test]
    fn ramp_table_plays_a_rising_saw() {
        let ctx = RenderCtx::new(44_100.0);
        let mut crafter = patched();
        let mut previous = -5.0;
        let mut wraps = 0;
        for _ in 0..1_000 {
            crafter.process(&ctx);
            let v = crafter.outputs.output.voltage(0);
            assert!((-5.01..=5.01).contains(&v), "{v} V");
            if v < previous - 1.0 {
                wraps += 1;
            }
            previous = v;
        }
        // 1000 samples of middle C at 44.1 kHz is about 5.9 cycles.
        assert_eq!(wraps, 5);
    }

    #[test]
    fn middle_c_phase_advance() {
        let ctx = RenderCtx::new(44_100.0);
        let mut crafter = patched();
        crafter.process(&ctx);
        assert!((crafter.phase(0) - C4_HZ / 44_100.0).abs() < 1e-6);
    }

    #[test]
    fn advance_is_clamped() {
        let ctx = RenderCtx::new(44_100.0);
        let mut crafter = patched();
        crafter.inputs.voct.set_poly(&[10.0, -20.0]);
        crafter.process(&ctx);
        assert_eq!(crafter.phase(0), MAX_ADVANCE);
        assert_eq!(crafter.phase(1), MIN_ADVANCE);
    }

    #[test]
    fn edited_table_is_read_back() {
        let ctx = RenderCtx::new(44_100.0);
        let mut crafter = patched();
        *crafter.table_mut() = Wavetable::from_samples(vec![1.0; 8]);
        crafter.process(&ctx);
        assert_eq!(crafter.outputs.output.voltage(0), 5.0);

        crafter.reset();
        assert_eq!(crafter.table(), &Wavetable::ramp());
    }

    #[test]
    fn polyphony_follows_voct() {
        let ctx = RenderCtx::new(44_100.0);
        let mut crafter = patched();
        crafter.inputs.voct.set_poly(&[0.0, 1.0, 2.0]);
        crafter.process(&ctx);
        assert_eq!(crafter.polyphony(), 3);
        assert_eq!(crafter.outputs.output.channels(), 3);
        assert!((crafter.phase(1) / crafter.phase(0) - 2.0).abs() < 1e-3);
    }
}
