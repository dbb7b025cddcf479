//! Polyphonic ADSR envelope generator.
//!
//! One [`EnvelopeVoice`] per channel of the gate input. Each segment knob can
//! be modulated by a CV through its own attenuator; the sum is clamped to
//! [0, 1] per voice. The envelope output spans 0..10 V.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::envelope::{EnvelopeLights, EnvelopeShape, EnvelopeVoice};
use crate::io::{Input, Output, RenderCtx};
use crate::modules::{polyphony, Module};
use crate::MAX_POLYPHONY;

/// Output voltage at full envelope level.
pub const ENVELOPE_VOLTS: f32 = 10.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub attack_mod: f32,
    pub decay_mod: f32,
    pub sustain_mod: f32,
    pub release_mod: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.5,
            decay: 0.5,
            sustain: 0.5,
            release: 0.5,
            attack_mod: 0.0,
            decay_mod: 0.0,
            sustain_mod: 0.0,
            release_mod: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdsrInputs {
    pub attack: Input,
    pub decay: Input,
    pub sustain: Input,
    pub release: Input,
    pub gate: Input,
    pub retrigger: Input,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdsrOutputs {
    pub envelope: Output,
}

#[derive(Debug, Clone)]
pub struct Adsr {
    pub params: AdsrParams,
    pub inputs: AdsrInputs,
    pub outputs: AdsrOutputs,
    voices: [EnvelopeVoice; MAX_POLYPHONY],
    polyphony: usize,
    lights: EnvelopeLights,
}

impl Adsr {
    pub fn new() -> Self {
        Self {
            params: AdsrParams::default(),
            inputs: AdsrInputs::default(),
            outputs: AdsrOutputs::default(),
            voices: [EnvelopeVoice::new(); MAX_POLYPHONY],
            polyphony: 1,
            lights: EnvelopeLights::default(),
        }
    }

    pub fn polyphony(&self) -> usize {
        self.polyphony
    }

    pub fn voice(&self, voice: usize) -> Option<&EnvelopeVoice> {
        self.voices.get(voice)
    }

    /// Segment lights OR-ed across the active voices.
    pub fn lights(&self) -> EnvelopeLights {
        self.lights
    }

    /// Knob positions for one voice after CV modulation.
    pub fn shape(&self, voice: usize) -> EnvelopeShape {
        let p = &self.params;
        let i = &self.inputs;
        EnvelopeShape {
            attack: modulated(p.attack, p.attack_mod, &i.attack, voice),
            decay: modulated(p.decay, p.decay_mod, &i.decay, voice),
            sustain: modulated(p.sustain, p.sustain_mod, &i.sustain, voice),
            release: modulated(p.release, p.release_mod, &i.release, voice),
        }
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn modulated(knob: f32, amount: f32, cv: &Input, voice: usize) -> f32 {
    let v = knob + cv.poly_voltage(voice) / 10.0 * amount;
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl Module for Adsr {
    fn process(&mut self, ctx: &RenderCtx) {
        self.polyphony = polyphony(self.inputs.gate.channels());
        self.outputs.envelope.set_channels(self.polyphony);

        let mut lights = EnvelopeLights::default();
        for voice in 0..self.polyphony {
            let shape = self.shape(voice);
            let gate = self.inputs.gate.voltage(voice);
            let retrigger = self.inputs.retrigger.poly_voltage(voice);

            let env = self.voices[voice].process(gate, retrigger, &shape, ctx.sample_time);
            self.outputs.envelope.set_voltage(voice, ENVELOPE_VOLTS * env);
            lights = lights.merge(self.voices[voice].lights());
        }
        self.lights = lights;
    }

    fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.polyphony = 1;
        self.lights = EnvelopeLights::default();
    }
}
