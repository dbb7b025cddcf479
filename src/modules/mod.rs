//! Synthesizer modules.
//!
//! Each module owns its knob values (`params`), its input and output ports
//! and the per-voice DSP state. The host writes the inputs, calls
//! [`Module::process`] once per sample and reads the outputs back.

use crate::io::RenderCtx;

pub mod adsr;
pub mod lfo;
pub mod noise;
pub mod vca;
pub mod vcf;
pub mod vco;
pub mod wavecrafter;

pub use adsr::Adsr;
pub use lfo::Lfo;
pub use noise::Noise;
pub use vca::Vca;
pub use vcf::{FilterMode, Vcf};
pub use vco::Vco;
pub use wavecrafter::WaveCrafter;

/// Core trait for per-sample modules
pub trait Module: Send {
    /// Consume the current inputs and write one sample to every connected output.
    fn process(&mut self, ctx: &RenderCtx);

    /// Return to the freshly constructed state, keeping params and patching.
    fn reset(&mut self);
}

/// Voice count for a module: the channel count of its primary input, at least 1.
#[inline]
pub(crate) fn polyphony(channels: usize) -> usize {
    channels.clamp(1, crate::MAX_POLYPHONY)
}

/// Number of 4-lane banks needed for `voices`.
#[inline]
pub(crate) fn bank_count(voices: usize) -> usize {
    voices.div_ceil(crate::dsp::LANES)
}
