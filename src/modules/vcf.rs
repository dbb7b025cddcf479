//! Voltage-controlled filter with low, band and high-pass outputs.
//!
//! The input passes through the drive stage and then one filter per output.
//! [`FilterMode::Iir`] uses 6th-order Butterworth cascades with a resonance
//! peak on the low and high-pass outputs; [`FilterMode::Fir`] uses
//! windowed-sinc kernels of `TAPS` taps and ignores resonance. Coefficients
//! are rebuilt only when the modulated cutoff or resonance moves.
//!
//! The filter is monophonic: it reads channel 0 of each input.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::butterworth::ButterworthCascade;
use crate::dsp::distortion::drive_stage;
use crate::dsp::fir::{Fir, DEFAULT_TAPS};
use crate::io::{Input, Output, RenderCtx};
use crate::modules::Module;

pub const MIN_CUTOFF_HZ: f32 = 10.0;
/// Upper cutoff limit as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.45;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Iir,
    Fir,
}

impl FilterMode {
    pub fn toggled(self) -> Self {
        match self {
            FilterMode::Iir => FilterMode::Fir,
            FilterMode::Fir => FilterMode::Iir,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcfParams {
    /// Hz, 20..20000.
    pub cutoff: f32,
    /// 0..1
    pub resonance: f32,
    /// 0..1
    pub drive: f32,
    /// Octaves per volt, -1..1.
    pub cutoff_mod: f32,
    /// -1..1
    pub resonance_mod: f32,
    /// -1..1
    pub drive_mod: f32,
}

impl Default for VcfParams {
    fn default() -> Self {
        Self {
            cutoff: 1_000.0,
            resonance: 0.0,
            drive: 0.0,
            cutoff_mod: 0.0,
            resonance_mod: 0.0,
            drive_mod: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcfInputs {
    pub input: Input,
    pub cutoff_mod: Input,
    pub resonance_mod: Input,
    pub drive_mod: Input,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VcfOutputs {
    pub lowpass: Output,
    pub bandpass: Output,
    pub highpass: Output,
}

/// Values the IIR coefficients were last built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Setting {
    cutoff_hz: f32,
    resonance: f32,
}

#[derive(Debug, Clone)]
pub struct Vcf<const TAPS: usize = DEFAULT_TAPS> {
    pub mode: FilterMode,
    pub params: VcfParams,
    pub inputs: VcfInputs,
    pub outputs: VcfOutputs,
    iir: [ButterworthCascade; 3],
    fir: [Fir<TAPS>; 3],
    iir_setting: Option<Setting>,
    fir_cutoff: Option<f32>,
}

const LOW: usize = 0;
const BAND: usize = 1;
const HIGH: usize = 2;

impl<const TAPS: usize> Vcf<TAPS> {
    pub fn new() -> Self {
        Self {
            mode: FilterMode::default(),
            params: VcfParams::default(),
            inputs: VcfInputs::default(),
            outputs: VcfOutputs::default(),
            iir: [ButterworthCascade::new(); 3],
            fir: [Fir::new(); 3],
            iir_setting: None,
            fir_cutoff: None,
        }
    }

    /// Cutoff after modulation, clamped to [10 Hz, 0.45 · sample rate].
    pub fn cutoff_hz(&self, ctx: &RenderCtx) -> f32 {
        let octaves = self.params.cutoff_mod * self.inputs.cutoff_mod.voltage(0);
        let hz = self.params.cutoff * 2.0_f32.powf(octaves);
        let max = MAX_CUTOFF_RATIO * ctx.sample_rate;
        if hz.is_nan() {
            return MIN_CUTOFF_HZ.min(max);
        }
        hz.clamp(MIN_CUTOFF_HZ.min(max), max)
    }

    pub fn resonance(&self) -> f32 {
        modulated(
            self.params.resonance,
            self.params.resonance_mod,
            &self.inputs.resonance_mod,
        )
    }

    pub fn drive(&self) -> f32 {
        modulated(self.params.drive, self.params.drive_mod, &self.inputs.drive_mod)
    }

    fn update_iir(&mut self, ctx: &RenderCtx, setting: Setting) {
        if self.iir_setting == Some(setting) {
            return;
        }
        let cutoff = setting.cutoff_hz * ctx.sample_time;
        self.iir[LOW].set_low_pass(cutoff);
        self.iir[LOW].set_resonance(cutoff, setting.resonance);
        self.iir[BAND].set_band_pass(cutoff);
        self.iir[HIGH].set_high_pass(cutoff);
        self.iir[HIGH].set_resonance(cutoff, setting.resonance);
        self.iir_setting = Some(setting);
    }

    fn update_fir(&mut self, ctx: &RenderCtx, cutoff_hz: f32) {
        if self.fir_cutoff == Some(cutoff_hz) {
            return;
        }
        self.fir[LOW].set_low_pass(cutoff_hz, ctx.sample_rate);
        self.fir[BAND].set_band_pass(cutoff_hz, ctx.sample_rate);
        self.fir[HIGH].set_high_pass(cutoff_hz, ctx.sample_rate);
        self.fir_cutoff = Some(cutoff_hz);
    }
}

impl<const TAPS: usize> Default for Vcf<TAPS> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn modulated(value: f32, amount: f32, cv: &Input) -> f32 {
    let v = value + amount * cv.voltage(0) / 10.0;
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl<const TAPS: usize> Module for Vcf<TAPS> {
    fn process(&mut self, ctx: &RenderCtx) {
        let wanted = [
            self.outputs.lowpass.is_connected(),
            self.outputs.bandpass.is_connected(),
            self.outputs.highpass.is_connected(),
        ];
        if !wanted.iter().any(|&w| w) {
            return;
        }

        let cutoff_hz = self.cutoff_hz(ctx);
        let driven = drive_stage(self.inputs.input.voltage(0), self.drive());

        let mut out = [0.0; 3];
        match self.mode {
            FilterMode::Iir => {
                let setting = Setting {
                    cutoff_hz,
                    resonance: self.resonance(),
                };
                self.update_iir(ctx, setting);
                for ((y, filter), _) in out
                    .iter_mut()
                    .zip(self.iir.iter_mut())
                    .zip(wanted)
                    .filter(|(_, w)| *w)
                {
                    *y = filter.process(driven);
                }
            }
            FilterMode::Fir => {
                self.update_fir(ctx, cutoff_hz);
                for ((y, filter), _) in out
                    .iter_mut()
                    .zip(self.fir.iter_mut())
                    .zip(wanted)
                    .filter(|(_, w)| *w)
                {
                    *y = filter.process(driven);
                }
            }
        }

        let VcfOutputs {
            lowpass,
            bandpass,
            highpass,
        } = &mut self.outputs;
        for ((output, y), w) in [lowpass, bandpass, highpass].into_iter().zip(out).zip(wanted) {
            if w {
                output.set_channels(1);
                output.set_voltage(0, y);
            }
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.iir {
            filter.reset();
        }
        for filter in &mut self.fir {
            filter.reset();
        }
        self.iir_setting = None;
        self.fir_cutoff = None;
    }
}
