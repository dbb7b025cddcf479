//! Buffered xorshift-style noise.
//!
//! Two 32-bit integer states are mixed with an xor and an add per sample,
//! the second state scaled to [-1, 1] is the output. Samples are generated
//! 128 at a time into a buffer that is read circularly and refilled whenever
//! the read position wraps. The sequence depends only on the seed.
//!
//! Red noise is white noise through a leaky integrator, which tilts the
//! spectrum towards low frequencies (roughly -6 dB/octave above a few Hz).

/// Samples produced per refill.
pub const NOISE_BLOCK: usize = 128;

const DEFAULT_SEED: (i32, i32) = (0x6745_2301, 0xefcd_ab89_u32 as i32);
const SCALE: f32 = 2.0 / 0xffff_ffff_u32 as f32;

const RED_LEAK: f32 = 0.995;
const RED_GAIN: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    x1: i32,
    x2: i32,
    white: [f32; NOISE_BLOCK],
    counter: usize,
    red: f32,
}

impl NoiseGenerator {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED.0, DEFAULT_SEED.1)
    }

    /// The block is filled immediately so the very first sample is noise.
    pub fn with_seed(x1: i32, x2: i32) -> Self {
        let mut noise = Self {
            x1,
            x2,
            white: [0.0; NOISE_BLOCK],
            counter: 0,
            red: 0.0,
        };
        noise.fill_block();
        noise
    }

    fn fill_block(&mut self) {
        for sample in self.white.iter_mut() {
            self.x1 ^= self.x2;
            *sample = self.x2 as f32 * SCALE;
            self.x2 = self.x2.wrapping_add(self.x1);
        }
    }

    /// Next white sample in [-1, 1]; also advances the red integrator.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.counter = (self.counter + 1) % NOISE_BLOCK;
        if self.counter == 0 {
            self.fill_block();
        }
        let white = self.white[self.counter];
        self.red = (RED_LEAK * self.red + RED_GAIN * white).clamp(-1.0, 1.0);
        white
    }

    /// Current red noise value in [-1, 1], updated by [`next_sample`](Self::next_sample).
    pub fn red(&self) -> f32 {
        self.red
    }

    /// Back to the default seed, with a freshly filled block.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}
