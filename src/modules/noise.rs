//! White and red noise source, ±10 V.

use crate::dsp::noise::NoiseGenerator;
use crate::io::{Output, RenderCtx};
use crate::modules::Module;

pub const NOISE_VOLTS: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseOutputs {
    pub white: Output,
    pub red: Output,
}

#[derive(Debug, Clone, Default)]
pub struct Noise {
    pub outputs: NoiseOutputs,
    generator: NoiseGenerator,
}

impl Noise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a custom seed instead of the default one.
    pub fn with_seed(x1: i32, x2: i32) -> Self {
        Self {
            outputs: NoiseOutputs::default(),
            generator: NoiseGenerator::with_seed(x1, x2),
        }
    }
}

impl Module for Noise {
    fn process(&mut self, _ctx: &RenderCtx) {
        if !self.outputs.white.is_connected() && !self.outputs.red.is_connected() {
            return;
        }

        let white = self.generator.next_sample();
        let red = self.generator.red();

        if self.outputs.white.is_connected() {
            self.outputs.white.set_channels(1);
            self.outputs.white.set_voltage(0, NOISE_VOLTS * white);
        }
        if self.outputs.red.is_connected() {
            self.outputs.red.set_channels(1);
            self.outputs.red.set_voltage(0, NOISE_VOLTS * red);
        }
    }

    fn reset(&mut self) {
        self.generator.reset();
    }
}
