//! Drive / Waveshaping
//!
//! The filter's drive knob pushes the input into a soft saturator before it
//! reaches the filter bank. Saturation adds harmonics that the filter then
//! sculpts, which is where the "growl" of a driven filter comes from.
//!
//! # Soft Clip
//!
//!   f(x) = x / (1 + |x|)
//!
//! Smooth and monotonic, approaches ±1 asymptotically. Nearly linear for
//! small inputs, gradually compresses peaks.
//!
//! # Drive Stage
//!
//! Signals arrive as ±5 V. The stage normalises to ±1, saturates with a gain
//! of `1 + 9·drive`, scales back to volts and crossfades with the dry input:
//!
//!   out = (1 − d)·x + d · 5·f((x / 5) · (1 + 9d))
//!
//!   d = 0    clean, the stage is an identity
//!   d = 0.5  warm, peaks rounded off
//!   d = 1    fully wet, heavy saturation at gain 10

/// Peak voltage of a full-scale audio signal.
const FULL_SCALE_VOLTS: f32 = 5.0;

/// Soft clipping using x / (1 + |x|) transfer function.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

/// Dry/wet saturation of a ±5 V signal. `drive` is clamped to [0, 1].
#[inline]
pub fn drive_stage(volts: f32, drive: f32) -> f32 {
    let d = drive.clamp(0.0, 1.0);
    if d == 0.0 {
        return volts;
    }
    let wet = FULL_SCALE_VOLTS * soft_clip(volts / FULL_SCALE_VOLTS, 1.0 + 9.0 * d);
    (1.0 - d) * volts + d * wet
}
