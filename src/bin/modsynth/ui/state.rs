//! Messages exchanged between the UI and audio threads
//!
//! Both types are `Copy` so they can travel through the ring buffers without
//! allocating in the audio callback.

use modsynth_dsp::dsp::envelope::EnvelopeLights;
use modsynth_dsp::dsp::oscillator::Waveform;
use modsynth_dsp::modules::vca::METER_SEGMENTS;
use modsynth_dsp::modules::FilterMode;

/// Commands sent from UI thread to audio thread
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlMessage {
    /// Hold or release the note
    ToggleGate,
    /// Restart the envelope attack without releasing the gate
    Retrigger,
    /// Move the note by a number of semitones
    Transpose(i8),
    /// Multiply the filter cutoff by this factor
    ScaleCutoff(f32),
    ToggleFilterMode,
    NextWaveform,
    /// Step the noise level through its presets
    CycleNoise,
}

/// Snapshot of the patch published by the audio thread
#[derive(Clone, Copy, Debug)]
pub struct PatchStatus {
    /// MIDI note number
    pub note: u8,
    pub gate: bool,
    /// Envelope output in volts (0-10)
    pub envelope: f32,
    pub cutoff_hz: f32,
    pub mode: FilterMode,
    pub waveform: Waveform,
    /// Noise level mixed into the filter input (0-1)
    pub noise_mix: f32,
    pub lights: EnvelopeLights,
    pub meter: [bool; METER_SEGMENTS],
    pub sample_rate: f32,
}
