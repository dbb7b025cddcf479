//! Low-frequency oscillator.
//!
//! Same oscillator core as the VCO with band-limiting off: at sub-audio rates
//! the edges need no correction. The frequency knob sweeps 1/32 Hz to 1024 Hz
//! exponentially; a trigger on the reset input restarts the cycle.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::approx::exp2_taylor5;
use crate::dsp::divider::ControlDivider;
use crate::dsp::oscillator::{OscillatorBank, WaveformSet, LANES};
use crate::dsp::trigger::SchmittTrigger;
use crate::io::{Input, Output, RenderCtx};
use crate::modules::{bank_count, polyphony, Module};
use crate::MAX_POLYPHONY;

const BANKS: usize = MAX_POLYPHONY / LANES;

/// Octaves covered by the frequency knob.
const KNOB_OCTAVES: f32 = 15.0;
/// Frequency at knob 0 as a power of two (2^-5 = 1/32 Hz).
const KNOB_BASE_OCTAVE: f32 = -5.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoParams {
    /// 0..1, mapped to 2^(15·knob − 5) Hz.
    pub frequency: f32,
    /// 0..1, clamped to 0.01..0.99 by the oscillator.
    pub pulse_width: f32,
    /// -1..1, in octaves per volt of FM.
    pub fm_amount: f32,
    /// -1..1
    pub pwm_amount: f32,
    /// Output 0..10 V instead of ±5 V.
    pub unipolar: bool,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            frequency: 0.0,
            pulse_width: 0.5,
            fm_amount: 0.0,
            pwm_amount: 0.0,
            unipolar: false,
        }
    }
}

impl LfoParams {
    /// Frequency in Hz for the current knob and `fm_volts` of modulation.
    pub fn frequency_hz(&self, fm_volts: f32) -> f32 {
        exp2_taylor5(
            KNOB_OCTAVES * self.frequency + KNOB_BASE_OCTAVE + fm_volts * self.fm_amount,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LfoInputs {
    pub fm: Input,
    pub reset: Input,
    pub pwm: Input,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LfoOutputs {
    pub sine: Output,
    pub triangle: Output,
    pub saw: Output,
    pub square: Output,
}

#[derive(Debug, Clone)]
pub struct Lfo {
    pub params: LfoParams,
    pub inputs: LfoInputs,
    pub outputs: LfoOutputs,
    banks: [OscillatorBank; BANKS],
    reset_triggers: [SchmittTrigger; MAX_POLYPHONY],
    divider: ControlDivider,
    polyphony: usize,
    wanted: WaveformSet,
}

impl Lfo {
    pub fn new() -> Self {
        let mut bank = OscillatorBank::new();
        bank.set_band_limited(false);
        Self {
            params: LfoParams::default(),
            inputs: LfoInputs::default(),
            outputs: LfoOutputs::default(),
            banks: [bank; BANKS],
            reset_triggers: [SchmittTrigger::new(); MAX_POLYPHONY],
            divider: ControlDivider::default(),
            polyphony: 1,
            wanted: WaveformSet::default(),
        }
    }

    pub fn polyphony(&self) -> usize {
        self.polyphony
    }

    pub fn phase(&self, voice: usize) -> f32 {
        self.banks
            .get(voice / LANES)
            .map_or(0.0, |bank| bank.phase(voice % LANES))
    }

    fn update_controls(&mut self, ctx: &RenderCtx) {
        self.polyphony = polyphony(self.inputs.fm.channels());

        for voice in 0..self.polyphony {
            let hz = self.params.frequency_hz(self.inputs.fm.voltage(voice));
            let pulse_width = self.params.pulse_width
                + self.inputs.pwm.poly_voltage(voice) / 10.0 * self.params.pwm_amount;

            let bank = &mut self.banks[voice / LANES];
            bank.set_frequency(voice % LANES, hz * ctx.sample_time);
            bank.set_pulse_width(voice % LANES, pulse_width);
        }

        let channels = self.polyphony;
        let LfoOutputs {
            sine,
            triangle,
            saw,
            square,
        } = &mut self.outputs;
        for output in [sine, triangle, saw, square] {
            output.set_channels(channels);
        }

        self.wanted = WaveformSet {
            sine: self.outputs.sine.is_connected(),
            triangle: self.outputs.triangle.is_connected(),
            saw: self.outputs.saw.is_connected(),
            square: self.outputs.square.is_connected(),
        };
    }

    #[inline]
    fn to_volts(&self, value: f32) -> f32 {
        if self.params.unipolar {
            (value + 1.0) * 5.0
        } else {
            value * 5.0
        }
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Lfo {
    fn process(&mut self, ctx: &RenderCtx) {
        if self.divider.tick() {
            self.update_controls(ctx);
        }

        let reset_patched = self.inputs.reset.is_connected();
        for bank_index in 0..bank_count(self.polyphony) {
            let first = bank_index * LANES;
            let active = (self.polyphony - first).min(LANES);

            let mut reset = [false; LANES];
            if reset_patched {
                for (lane, edge) in reset.iter_mut().enumerate().take(active) {
                    let voice = first + lane;
                    *edge = self.reset_triggers[voice].process(self.inputs.reset.poly_voltage(voice));
                }
            }

            let out = self.banks[bank_index].process(active, reset, self.wanted);

            for lane in 0..active {
                let voice = first + lane;
                let sine = self.to_volts(out.sine[lane]);
                let triangle = self.to_volts(out.triangle[lane]);
                let saw = self.to_volts(out.saw[lane]);
                let square = self.to_volts(out.square[lane]);
                if self.wanted.sine {
                    self.outputs.sine.set_voltage(voice, sine);
                }
                if self.wanted.triangle {
                    self.outputs.triangle.set_voltage(voice, triangle);
                }
                if self.wanted.saw {
                    self.outputs.saw.set_voltage(voice, saw);
                }
                if self.wanted.square {
                    self.outputs.square.set_voltage(voice, square);
                }
            }
        }
    }

    fn reset(&mut self) {
        for bank in &mut self.banks {
            bank.reset();
        }
        for trigger in &mut self.reset_triggers {
            trigger.reset();
        }
        self.divider.reset();
        self.polyphony = 1;
    }
}
