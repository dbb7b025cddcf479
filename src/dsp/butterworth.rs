use super::biquad::Biquad;

/*
Cascaded Butterworth Filter
===========================

A 6th-order Butterworth response is three biquads in series. Each section
places one conjugate pole pair on the Butterworth circle, so the sections
differ only in their quality factor:

    Q_k = 1 / (2·sin((2k − 1)·π / 12)),  k = 1..3

    stage 0   Q = 0.5176   (widest, no peaking)
    stage 1   Q = 0.7071
    stage 2   Q = 1.9319   (sharpest knee)

Chained they give a flat passband and a 36 dB/octave slope.

Resonance
---------

The filter panel's resonance knob adds a fourth section: a peaking EQ at the
cutoff. Amount 0 bypasses it, amount 1 boosts a narrow band by 18 dB, which
reads as the familiar "whistle" of a resonant low-pass without risking
self-oscillation.

    gain_db = 18 · amount
    Q       = 0.5 + 7.5 · amount
*/

pub const STAGE_QUALITY: [f32; 3] = [0.517_638_09, 0.707_106_78, 1.931_851_7];

const MAX_RESONANCE_DB: f32 = 18.0;

#[derive(Debug, Clone, Copy)]
pub struct ButterworthCascade {
    stages: [Biquad; 3],
    resonance: Biquad,
    resonant: bool,
}

impl ButterworthCascade {
    pub fn new() -> Self {
        Self {
            stages: [Biquad::new(); 3],
            resonance: Biquad::new(),
            resonant: false,
        }
    }

    pub fn set_low_pass(&mut self, cutoff: f32) {
        for (stage, &q) in self.stages.iter_mut().zip(STAGE_QUALITY.iter()) {
            stage.set_low_pass_q(cutoff, q);
        }
    }

    pub fn set_band_pass(&mut self, cutoff: f32) {
        for (stage, &q) in self.stages.iter_mut().zip(STAGE_QUALITY.iter()) {
            stage.set_band_pass(cutoff, q);
        }
    }

    pub fn set_high_pass(&mut self, cutoff: f32) {
        for (stage, &q) in self.stages.iter_mut().zip(STAGE_QUALITY.iter()) {
            stage.set_high_pass_q(cutoff, q);
        }
    }

    /// Configure the peaking stage. `amount` is clamped to [0, 1]; 0 bypasses it.
    pub fn set_resonance(&mut self, cutoff: f32, amount: f32) {
        let amount = amount.clamp(0.0, 1.0);
        let was_resonant = self.resonant;
        self.resonant = amount > 0.0;
        if self.resonant {
            self.resonance
                .set_peak(cutoff, MAX_RESONANCE_DB * amount, 0.5 + 7.5 * amount);
            if !was_resonant {
                self.resonance.reset();
            }
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut out = input;
        for stage in &mut self.stages {
            out = stage.process(out);
        }
        if self.resonant {
            out = self.resonance.process(out);
        }
        out
    }

    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.resonance.reset();
    }

    pub fn is_resonant(&self) -> bool {
        self.resonant
    }
}

impl Default for ButterworthCascade {
    fn default() -> Self {
        Self::new()
    }
}
