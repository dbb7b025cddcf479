// Purpose - the host contract: render context, polyphonic ports, voltage conversions

pub mod port;

pub use port::{Input, Output};

/// Context passed to modules on every sample
///
/// Contains information about how to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - sample_time: Duration of one sample in seconds (1 / sample_rate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub sample_time: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sample_rate.max(1.0);
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
        }
    }
}

impl Default for RenderCtx {
    fn default() -> Self {
        Self::new(44_100.0)
    }
}

/// 1V/octave pitch of a MIDI note, with middle C (note 60) at 0 V.
pub fn note_to_volts(note: u8) -> f32 {
    (note as f32 - 60.0) / 12.0
}

/// Frequency of a 1V/octave voltage, with 0 V at middle C.
pub fn volts_to_freq(volts: f32) -> f32 {
    crate::C4_HZ * 2.0_f32.powf(volts)
}
