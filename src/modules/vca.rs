//! Dual polyphonic VCA with level meters.
//!
//! Each of the two channels scales its input by the amplitude knob and, when
//! patched, by the modulation CV (0..10 V maps to 0..1, clamped). Each
//! channel drives a ten-segment meter, one volt per segment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::io::{Input, Output, RenderCtx};
use crate::modules::{polyphony, Module};

pub const CHANNELS: usize = 2;
pub const METER_SEGMENTS: usize = 10;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcaParams {
    /// 0..1 per channel.
    pub amplitude: [f32; CHANNELS],
}

impl Default for VcaParams {
    fn default() -> Self {
        Self {
            amplitude: [1.0; CHANNELS],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcaInputs {
    pub input: [Input; CHANNELS],
    pub modulation: [Input; CHANNELS],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcaOutputs {
    pub output: [Output; CHANNELS],
}

#[derive(Debug, Clone, Default)]
pub struct Vca {
    pub params: VcaParams,
    pub inputs: VcaInputs,
    pub outputs: VcaOutputs,
    meters: [[bool; METER_SEGMENTS]; CHANNELS],
}

impl Vca {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lit segments of a channel's meter, lowest first.
    pub fn meter(&self, channel: usize) -> [bool; METER_SEGMENTS] {
        self.meters.get(channel).copied().unwrap_or_default()
    }

    /// Gain applied to one voice of `channel`; 0 for channels the VCA lacks.
    pub fn gain(&self, channel: usize, voice: usize) -> f32 {
        let (Some(amplitude), Some(modulation)) = (
            self.params.amplitude.get(channel),
            self.inputs.modulation.get(channel),
        ) else {
            return 0.0;
        };
        let amplitude = amplitude.clamp(0.0, 1.0);
        if modulation.is_connected() {
            amplitude * (modulation.poly_voltage(voice) / 10.0).clamp(0.0, 1.0)
        } else {
            amplitude
        }
    }
}

impl Module for Vca {
    fn process(&mut self, _ctx: &RenderCtx) {
        for channel in 0..CHANNELS {
            let voices = polyphony(self.inputs.input[channel].channels());
            let mut peak = 0.0f32;
            for voice in 0..voices {
                let volts = self.inputs.input[channel].voltage(voice) * self.gain(channel, voice);
                self.outputs.output[channel].set_voltage(voice, volts);
                peak = peak.max(volts.abs());
            }
            self.outputs.output[channel].set_channels(voices);

            for (segment, lit) in self.meters[channel].iter_mut().enumerate() {
                *lit = peak >= (segment + 1) as f32;
            }
        }
    }

    fn reset(&mut self) {
        self.meters = [[false; METER_SEGMENTS]; CHANNELS];
    }
}
