use std::f32::consts::{PI, SQRT_2, TAU};

/*
Windowed-Sinc FIR
=================

An ideal low-pass has an infinitely long `sinc` impulse response. Truncating
it to N taps and tapering the edges with a window gives a practical
finite-impulse-response filter with linear phase and no feedback.

Kernel (N taps, centre M = N/2, ωc = 2π · cutoff / sample_rate):

    low-pass   h[i] = sin(ωc·(i − M)) / (π·(i − M)),   h[M] = ωc/π
    high-pass  h[i] = −sin(ωc·(i − M)) / (π·(i − M)),  h[M] = 1 − ωc/π
    window     w[i] = 0.54 − 0.46 · cos(2π·i / N)      (Hamming)

The high-pass is the spectral inversion of the low-pass (a unit impulse minus
the low-pass); the Hamming window equals 1 at the centre so the inversion is
exact. The band-pass is the difference of two low-pass kernels half an
octave either side of the cutoff.

Every output is a full N-tap dot product, O(N) per sample. With N = 64 and a
cutoff at 1/12 of the sample rate the stopband two octaves above the cutoff
sits more than 55 dB down; below roughly sample_rate / 64 the kernel is too
short to resolve the cutoff and the passband gain drops.
*/

/// Tap count used when none is given.
pub const DEFAULT_TAPS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct Fir<const N: usize = DEFAULT_TAPS> {
    coefs: [f32; N],
    buffer: [f32; N],
    index: usize,
}

impl<const N: usize> Fir<N> {
    /// An all-zero kernel; the filter outputs silence until a response is set.
    pub fn new() -> Self {
        Self {
            coefs: [0.0; N],
            buffer: [0.0; N],
            index: 0,
        }
    }

    pub fn set_low_pass(&mut self, cutoff_hz: f32, sample_rate_hz: f32) {
        self.coefs = low_pass_kernel(cutoff_hz, sample_rate_hz);
    }

    pub fn set_high_pass(&mut self, cutoff_hz: f32, sample_rate_hz: f32) {
        let omega = TAU * cutoff_hz / sample_rate_hz;
        let centre = N / 2;
        for (i, coef) in self.coefs.iter_mut().enumerate() {
            let tap = if i == centre {
                1.0 - omega / PI
            } else {
                let offset = i as f32 - centre as f32;
                -(omega * offset).sin() / (PI * offset)
            };
            *coef = tap * hamming(i, N);
        }
    }

    /// Band-pass spanning `cutoff / √2 .. cutoff · √2`. The upper edge stops at Nyquist.
    pub fn set_band_pass(&mut self, cutoff_hz: f32, sample_rate_hz: f32) {
        let upper_hz = (cutoff_hz * SQRT_2).min(0.5 * sample_rate_hz);
        let upper = low_pass_kernel::<N>(upper_hz, sample_rate_hz);
        let lower = low_pass_kernel::<N>(cutoff_hz / SQRT_2, sample_rate_hz);
        for ((coef, hi), lo) in self.coefs.iter_mut().zip(upper.iter()).zip(lower.iter()) {
            *coef = hi - lo;
        }
    }

    /// Push one sample into the history and return the convolution sum.
    /// `coefs[0]` weights the newest sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if N == 0 {
            return 0.0;
        }
        let newest = self.index;
        self.buffer[newest] = input;
        self.index = if newest + 1 == N { 0 } else { newest + 1 };

        // Taps 0..=newest read the history backwards from the newest sample,
        // the remaining taps continue from the end of the buffer.
        let (recent, older) = self.coefs.split_at(newest + 1);
        let mut out = 0.0;
        for (coef, sample) in recent.iter().zip(self.buffer[..=newest].iter().rev()) {
            out += coef * sample;
        }
        for (coef, sample) in older.iter().zip(self.buffer[newest + 1..].iter().rev()) {
            out += coef * sample;
        }
        out
    }

    pub fn reset(&mut self) {
        self.buffer = [0.0; N];
        self.index = 0;
    }

    pub fn coefficients(&self) -> &[f32; N] {
        &self.coefs
    }
}

impl<const N: usize> Default for Fir<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn low_pass_kernel<const N: usize>(cutoff_hz: f32, sample_rate_hz: f32) -> [f32; N] {
    let omega = TAU * cutoff_hz / sample_rate_hz;
    let centre = N / 2;
    let mut kernel = [0.0; N];
    for (i, coef) in kernel.iter_mut().enumerate() {
        let tap = if i == centre {
            omega / PI
        } else {
            let offset = i as f32 - centre as f32;
            (omega * offset).sin() / (PI * offset)
        };
        *coef = tap * hamming(i, N);
    }
    kernel
}

#[inline]
fn hamming(i: usize, taps: usize) -> f32 {
    0.54 - 0.46 * (TAU * i as f32 / taps as f32).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::approx::sin_2pi;

    const SAMPLE_RATE: f32 = 48_000.0;
    const CUTOFF: f32 = 4_000.0;

    fn sine_gain(filter: &mut Fir, freq_hz: f32) -> f32 {
        filter.reset();
        let step = freq_hz / SAMPLE_RATE;
        let mut input_power = 0.0;
        let mut output_power = 0.0;
        for n in 0..4096 {
            let x = sin_2pi(step * n as f32);
            let y = filter.process(x);
            if n >= 256 {
                input_power += x * x;
                output_power += y * y;
            }
        }
        (output_power / input_power).sqrt()
    }

    fn db(gain: f32) -> f32 {
        20.0 * gain.log10()
    }

    #[test]
    fn impulse_response_reproduces_kernel() {
        let mut filter: Fir<8> = Fir::new();
        filter.set_low_pass(3_000.0, SAMPLE_RATE);
        let kernel = *filter.coefficients();

        let mut response = [0.0; 8];
        response[0] = filter.process(1.0);
        for out in response.iter_mut().skip(1) {
            *out = filter.process(0.0);
        }
        for (i, (a, b)) in response.iter().zip(kernel.iter()).enumerate() {
            assert!((a - b).abs() < 1e-7, "tap {i}: {a} != {b}");
        }
        // History has fully wrapped: the impulse is gone.
        assert_eq!(filter.process(0.0), 0.0);
    }

    #[test]
    fn lowpass_preserves_half_cutoff() {
        let mut filter: Fir = Fir::new();
        filter.set_low_pass(CUTOFF, SAMPLE_RATE);
        let gain = sine_gain(&mut filter, CUTOFF / 2.0);
        assert!((gain - 1.0).abs() < 0.01, "passband gain {gain}");
    }

    #[test]
    fn lowpass_rejects_four_times_cutoff() {
        let mut filter: Fir = Fir::new();
        filter.set_low_pass(CUTOFF, SAMPLE_RATE);
        let attenuation = db(sine_gain(&mut filter, CUTOFF * 4.0));
        assert!(attenuation < -55.0, "stopband {attenuation} dB");
    }

    #[test]
    fn highpass_rejects_dc() {
        let mut filter: Fir = Fir::new();
        filter.set_high_pass(CUTOFF, SAMPLE_RATE);
        let mut out = 0.0;
        for _ in 0..256 {
            out = filter.process(1.0);
        }
        assert!(out.abs() < 0.01, "DC leak {out}");
        let passband = sine_gain(&mut filter, CUTOFF * 4.0);
        assert!((passband - 1.0).abs() < 0.01, "passband gain {passband}");
    }

    #[test]
    fn bandpass_keeps_centre_and_drops_edges() {
        let mut filter: Fir = Fir::new();
        filter.set_band_pass(CUTOFF, SAMPLE_RATE);
        let centre = sine_gain(&mut filter, CUTOFF);
        let low = sine_gain(&mut filter, 500.0);
        let high = sine_gain(&mut filter, 16_000.0);
        assert!((centre - 1.0).abs() < 0.02, "centre gain {centre}");
        assert!(low < 0.01 && high < 0.01, "edge gains {low} {high}");
    }

    #[test]
    fn fresh_filter_is_silent() {
        let mut filter: Fir<16> = Fir::default();
        assert_eq!(filter.process(1.0), 0.0);
    }
}
