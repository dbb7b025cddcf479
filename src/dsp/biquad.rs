use std::f32::consts::{FRAC_1_SQRT_2, PI};

/*
Biquad (second-order IIR section)
=================================

A biquad computes each output from the current input, the two previous
inputs and the two previous outputs:

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a0·y[n-1] - a1·y[n-2]

`b` holds the feedforward taps, `a` the feedback taps (already normalised so
the leading denominator coefficient is 1). The histories `x` and `y` persist
between calls: a filter is a stateful object, never a pure function of the
current sample.

Coefficients come from the analog prototype through the bilinear transform.
The cutoff is pre-warped with

    K = tan(π · cutoff)

where `cutoff` is normalised to the sample rate (Hz · sample period), so it
lives in [0, 0.5). As cutoff approaches 0.5 (Nyquist) K goes to infinity;
callers keep the cutoff strictly below it.

| response  | b0          | b1           | b2          | a0             | a1                |
| --------- | ----------- | ------------ | ----------- | -------------- | ----------------- |
| low-pass  | K²·n        | 2·b0         | b0          | 2(K² − 1)·n    | (1 − K/Q + K²)·n  |
| high-pass | n           | −2·b0        | b0          | 2(K² − 1)·n    | (1 − K/Q + K²)·n  |
| band-pass | K/Q·n       | 0            | −b0         | 2(K² − 1)·n    | (1 − K/Q + K²)·n  |

with n = 1 / (1 + K/Q + K²). A plain low/high-pass uses Q = 1/√2, the
maximally flat second-order Butterworth section.
*/

/// Smallest quality factor accepted before coefficients are computed.
pub const MIN_QUALITY: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b: [f32; 3],
    a: [f32; 2],
    x: [f32; 2],
    y: [f32; 2],
}

impl Biquad {
    /// A pass-through section (b0 = 1, everything else 0).
    pub fn new() -> Self {
        Self {
            b: [1.0, 0.0, 0.0],
            a: [0.0, 0.0],
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    /// Butterworth low-pass at a normalised cutoff.
    pub fn set_low_pass(&mut self, cutoff: f32) {
        self.set_low_pass_q(cutoff, FRAC_1_SQRT_2);
    }

    pub fn set_low_pass_q(&mut self, cutoff: f32, quality: f32) {
        let q = quality.max(MIN_QUALITY);
        let k = (PI * cutoff).tan();
        let norm = 1.0 / (1.0 + k / q + k * k);

        self.b[0] = k * k * norm;
        self.b[1] = 2.0 * self.b[0];
        self.b[2] = self.b[0];
        self.a[0] = 2.0 * (k * k - 1.0) * norm;
        self.a[1] = (1.0 - k / q + k * k) * norm;
    }

    /// Constant-peak band-pass centred on `cutoff`.
    pub fn set_band_pass(&mut self, cutoff: f32, quality: f32) {
        let q = quality.max(MIN_QUALITY);
        let k = (PI * cutoff).tan();
        let norm = 1.0 / (1.0 + k / q + k * k);

        self.b[0] = k / q * norm;
        self.b[1] = 0.0;
        self.b[2] = -self.b[0];
        self.a[0] = 2.0 * (k * k - 1.0) * norm;
        self.a[1] = (1.0 - k / q + k * k) * norm;
    }

    /// Butterworth high-pass at a normalised cutoff.
    pub fn set_high_pass(&mut self, cutoff: f32) {
        self.set_high_pass_q(cutoff, FRAC_1_SQRT_2);
    }

    pub fn set_high_pass_q(&mut self, cutoff: f32, quality: f32) {
        let q = quality.max(MIN_QUALITY);
        let k = (PI * cutoff).tan();
        let norm = 1.0 / (1.0 + k / q + k * k);

        self.b[0] = norm;
        self.b[1] = -2.0 * self.b[0];
        self.b[2] = self.b[0];
        self.a[0] = 2.0 * (k * k - 1.0) * norm;
        self.a[1] = (1.0 - k / q + k * k) * norm;
    }

    /// Peaking EQ: boosts (or cuts, for negative `gain_db`) a band around
    /// `cutoff` and leaves DC and Nyquist at unity.
    pub fn set_peak(&mut self, cutoff: f32, gain_db: f32, quality: f32) {
        let q = quality.max(MIN_QUALITY);
        let k = (PI * cutoff).tan();
        let v = 10.0_f32.powf(gain_db.abs() / 20.0);

        if gain_db >= 0.0 {
            let norm = 1.0 / (1.0 + k / q + k * k);
            self.b[0] = (1.0 + v / q * k + k * k) * norm;
            self.b[1] = 2.0 * (k * k - 1.0) * norm;
            self.b[2] = (1.0 - v / q * k + k * k) * norm;
            self.a[0] = self.b[1];
            self.a[1] = (1.0 - k / q + k * k) * norm;
        } else {
            let norm = 1.0 / (1.0 + v / q * k + k * k);
            self.b[0] = (1.0 + k / q + k * k) * norm;
            self.b[1] = 2.0 * (k * k - 1.0) * norm;
            self.b[2] = (1.0 - k / q + k * k) * norm;
            self.a[0] = self.b[1];
            self.a[1] = (1.0 - v / q * k + k * k) * norm;
        }
    }

    /// Direct-form-I step: consume one input sample, return one output sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b[0] * input + self.b[1] * self.x[0] + self.b[2] * self.x[1]
            - self.a[0] * self.y[0]
            - self.a[1] * self.y[1];

        self.x[1] = self.x[0];
        self.x[0] = input;
        self.y[1] = self.y[0];
        self.y[0] = output;

        output
    }

    /// Clear the input/output history, keeping the coefficients.
    pub fn reset(&mut self) {
        self.x = [0.0; 2];
        self.y = [0.0; 2];
    }

    pub fn feedforward(&self) -> [f32; 3] {
        self.b
    }

    pub fn feedback(&self) -> [f32; 2] {
        self.a
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
