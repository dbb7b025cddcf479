//! Low-level DSP primitives used by the synthesizer modules.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside module structs. They stay
//! focused on the signal-processing math; the `modules` layer reads ports,
//! clamps knob values and schedules control-rate updates.

/// Fast polynomial approximations of `2^x` and `sin(2πx)`.
pub mod approx;
/// Second-order direct-form-I IIR section.
pub mod biquad;
/// Three-stage 6th-order Butterworth cascade with a resonance stage.
pub mod butterworth;
/// Control-rate scheduling counter.
pub mod divider;
/// Waveshaping used by filter drive stages.
pub mod distortion;
/// Exponential ADSR envelope state machine.
pub mod envelope;
/// Windowed-sinc FIR filter.
pub mod fir;
/// Minimum-phase band-limited step generator.
pub mod minblep;
/// Lightweight xorshift white and red noise.
pub mod noise;
/// Four-lane band-limited oscillator core.
pub mod oscillator;
/// Gate, trigger and sync edge detectors.
pub mod trigger;
/// Editable lookup table with 4-point interpolation.
pub mod wavetable;

pub use envelope::EnvelopeVoice;
pub use oscillator::{OscillatorBank, LANES};
