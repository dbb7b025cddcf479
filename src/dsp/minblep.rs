//! Minimum-phase band-limited step (MinBLEP) correction.

/*
MinBLEP
=======

A naive saw or square jumps between two levels inside a single sample. The
jump contains energy at every frequency, and everything above Nyquist folds
back down as inharmonic aliasing.

A band-limited step (BLEP) is what the jump would look like if the signal had
been low-passed first: a smooth rise with some ringing. Subtracting the ideal
step and adding the band-limited one leaves only the correction

    correction(t) = jump · (blep(t) − 1)

which decays to zero a few samples after the edge. Making the step minimum
phase pushes all of its energy after the edge, so the correction can be
emitted causally from a short ring buffer.

Kernel construction (done once, shared by every generator)
----------------------------------------------------------

    1. sinc with ZERO_CROSSINGS lobes each side, OVERSAMPLE points per sample
    2. Blackman-Harris window
    3. real cepstrum: FFT → ln|X| → IFFT
    4. fold the cepstrum (double the causal half, zero the anti-causal half)
    5. FFT → complex exp → IFFT  (minimum-phase impulse)
    6. running sum, normalised so the last value is 1 (the step)

The table stores KERNEL_LEN = 2·Z·O + 1 points so linear interpolation between
`index` and `index + 1` never reads past the end.

Generator
---------

`insert_discontinuity(lane, p, jump)` adds the correction for an edge that
happened `p` samples before the current one (p ∈ (−1, 0]) to the next
2·ZERO_CROSSINGS slots of the ring. `process()` returns and clears the slot
for the current sample, then advances. Each lane of a bank owns its own
column of the ring, so four voices share one buffer walk.
*/

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::OnceLock;

/// Sinc zero crossings on each side of the step.
pub const ZERO_CROSSINGS: usize = 16;
/// Kernel points per output sample.
pub const OVERSAMPLE: usize = 16;
/// Output samples a single correction spans.
pub const SPAN: usize = 2 * ZERO_CROSSINGS;
pub const KERNEL_LEN: usize = SPAN * OVERSAMPLE + 1;

static KERNEL: OnceLock<[f32; KERNEL_LEN]> = OnceLock::new();

/// The shared step table, built on first use.
pub fn kernel() -> &'static [f32; KERNEL_LEN] {
    KERNEL.get_or_init(build_kernel)
}

fn build_kernel() -> [f32; KERNEL_LEN] {
    let n = SPAN * OVERSAMPLE;
    let z = ZERO_CROSSINGS as f64;
    let last = (n - 1) as f64;

    let mut buffer: Vec<Complex<f64>> = (0..n)
        .map(|i| {
            let x = -z + 2.0 * z * i as f64 / last;
            let sinc = if x == 0.0 { 1.0 } else { (PI * x).sin() / (PI * x) };
            Complex::new(sinc * blackman_harris(i as f64 / last), 0.0)
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);
    let scale = 1.0 / n as f64;

    // Real cepstrum
    forward.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin = Complex::new((bin.norm() + 1e-30).ln(), 0.0);
    }
    inverse.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin *= scale;
    }

    // Fold onto the causal half
    let half = (n + 1) / 2;
    for bin in &mut buffer[1..half] {
        *bin *= 2.0;
    }
    for bin in &mut buffer[half..] {
        *bin = Complex::new(0.0, 0.0);
    }

    // Minimum-phase reconstruction
    forward.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin = bin.exp();
    }
    inverse.process(&mut buffer);

    // Integrate the impulse into a step
    let mut kernel = [0.0f32; KERNEL_LEN];
    let mut running = Vec::with_capacity(n);
    let mut total = 0.0f64;
    for bin in &buffer {
        total += bin.re * scale;
        running.push(total);
    }
    for (slot, value) in kernel.iter_mut().zip(running.iter()) {
        *slot = (value / total) as f32;
    }
    kernel[n] = 1.0;
    kernel
}

fn blackman_harris(p: f64) -> f64 {
    0.35875 - 0.48829 * (2.0 * PI * p).cos() + 0.14128 * (4.0 * PI * p).cos()
        - 0.01168 * (6.0 * PI * p).cos()
}

/// Ring buffer of pending step corrections for `L` independent lanes.
#[derive(Debug, Clone, Copy)]
pub struct MinBlep<const L: usize> {
    buffer: [[f32; L]; SPAN],
    pos: usize,
    kernel: &'static [f32; KERNEL_LEN],
}

impl<const L: usize> MinBlep<L> {
    pub fn new() -> Self {
        Self {
            buffer: [[0.0; L]; SPAN],
            pos: 0,
            kernel: kernel(),
        }
    }

    /// Schedule a step of height `jump` that occurred `p` samples ago on `lane`.
    /// Offsets outside (−1, 0] are ignored.
    pub fn insert_discontinuity(&mut self, lane: usize, p: f32, jump: f32) {
        if !(p > -1.0 && p <= 0.0) || lane >= L {
            return;
        }
        for j in 0..SPAN {
            let position = (j as f32 - p) * OVERSAMPLE as f32;
            let index = (position as usize).min(KERNEL_LEN - 2);
            let lambda = position - index as f32;
            let step = self.kernel[index] * (1.0 - lambda) + self.kernel[index + 1] * lambda;
            self.buffer[(self.pos + j) % SPAN][lane] += jump * (step - 1.0);
        }
    }

    /// Emit and clear the corrections due at the current sample.
    #[inline]
    pub fn process(&mut self) -> [f32; L] {
        let out = self.buffer[self.pos];
        self.buffer[self.pos] = [0.0; L];
        self.pos = (self.pos + 1) % SPAN;
        out
    }

    pub fn reset(&mut self) {
        self.buffer = [[0.0; L]; SPAN];
        self.pos = 0;
    }
}

impl<const L: usize> Default for MinBlep<L> {
    fn default() -> Self {
        Self::new()
    }
}
