#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::approx::sin_2pi;
use super::minblep::MinBlep;

/*
Band-Limited Oscillator Core
============================

One `OscillatorBank` runs four voices ("lanes") side by side. The VCO and
LFO modules own ceil(polyphony / 4) banks and hand each bank the number of
lanes that are actually in use.

Vocabulary
----------

  phase       Position inside the current cycle, in [0, 1).

  advance     How far the phase moves per sample: frequency × sample period.
              An advance of 0.01 is a cycle every 100 samples.

  pulse width Fraction of the cycle the square spends high, in [0.01, 0.99].

  edge        A sample interval in which a waveform jumps. The saw jumps
              from +1 to −1 at phase 0.5, the square jumps up at phase 0 and
              down at the pulse width.


Waveforms (all ±1)
------------------

    saw       2·frac(phase + 0.5) − 1
    square    +1 while phase < pulse width, −1 after
    triangle  2·|saw| − 1            (continuous, no correction needed)
    sine      sin(2π·phase)          (polynomial, see approx.rs)


Detect then Correct
-------------------

After advancing, the previous phase is `phase − advance` (negative when the
phase just wrapped). A threshold θ was crossed during this sample if

    t = (θ − previous) / advance,   0 < t ≤ 1

and the crossing happened (1 − t) samples ago. The matching MinBLEP
generator receives the jump at offset `t − 1`, and its output is added to
the naive waveform:

    saw     θ = 0.5           jump −2
    square  θ = 0 (wrap)      jump +2
            θ = pulse width   jump −2

When the phase wrapped this sample, a threshold the old phase passed before
reaching 1 sits at θ − 1 on the same axis. Narrow pulses at high pitch hit
this: the falling edge and the wrap land in one sample and need both jumps.

Only waveforms somebody listens to are corrected; the others skip both the
insert and the generator step.


Hard Sync
---------

A sync edge forces the phase back to 0 on that sample. The saw and square
jump from wherever they were to their phase-0 values, and those jumps are
inserted at offset 0 so the reset is band-limited too.
*/

/// Voices processed together by one bank.
pub const LANES: usize = 4;

/// Largest phase advance accepted by [`OscillatorBank::set_frequency`].
pub const MAX_ADVANCE: f32 = 0.49;
pub const MIN_PULSE_WIDTH: f32 = 0.01;
pub const MAX_PULSE_WIDTH: f32 = 0.99;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
    ];

    pub fn next(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Triangle,
            Waveform::Triangle => Waveform::Saw,
            Waveform::Saw => Waveform::Square,
            Waveform::Square => Waveform::Sine,
        }
    }
}

/// Which waveforms to compute this sample, usually the connected outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformSet {
    pub sine: bool,
    pub triangle: bool,
    pub saw: bool,
    pub square: bool,
}

impl WaveformSet {
    pub const ALL: WaveformSet = WaveformSet {
        sine: true,
        triangle: true,
        saw: true,
        square: true,
    };

    pub fn only(waveform: Waveform) -> Self {
        let mut set = Self::default();
        match waveform {
            Waveform::Sine => set.sine = true,
            Waveform::Triangle => set.triangle = true,
            Waveform::Saw => set.saw = true,
            Waveform::Square => set.square = true,
        }
        set
    }

    pub fn any(&self) -> bool {
        self.sine || self.triangle || self.saw || self.square
    }
}

/// One sample of every waveform for each lane. Unrequested waveforms and
/// lanes beyond the active count are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Waveforms {
    pub sine: [f32; LANES],
    pub triangle: [f32; LANES],
    pub saw: [f32; LANES],
    pub square: [f32; LANES],
}

impl Waveforms {
    pub fn get(&self, waveform: Waveform) -> &[f32; LANES] {
        match waveform {
            Waveform::Sine => &self.sine,
            Waveform::Triangle => &self.triangle,
            Waveform::Saw => &self.saw,
            Waveform::Square => &self.square,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OscillatorBank {
    phase: [f32; LANES],
    advance: [f32; LANES],
    pulse_width: [f32; LANES],
    saw_blep: MinBlep<LANES>,
    square_blep: MinBlep<LANES>,
    band_limited: bool,
}

impl OscillatorBank {
    pub fn new() -> Self {
        Self {
            phase: [0.0; LANES],
            advance: [0.0; LANES],
            pulse_width: [0.5; LANES],
            saw_blep: MinBlep::new(),
            square_blep: MinBlep::new(),
            band_limited: true,
        }
    }

    /// Set a lane's advance (frequency × sample period), clamped to [0, MAX_ADVANCE].
    pub fn set_frequency(&mut self, lane: usize, advance: f32) {
        if let Some(slot) = self.advance.get_mut(lane) {
            *slot = if advance.is_nan() {
                0.0
            } else {
                advance.clamp(0.0, MAX_ADVANCE)
            };
        }
    }

    pub fn set_pulse_width(&mut self, lane: usize, pulse_width: f32) {
        if let Some(slot) = self.pulse_width.get_mut(lane) {
            *slot = pulse_width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
        }
    }

    /// Toggle MinBLEP correction. Pending corrections are dropped.
    pub fn set_band_limited(&mut self, band_limited: bool) {
        if self.band_limited != band_limited {
            self.saw_blep.reset();
            self.square_blep.reset();
        }
        self.band_limited = band_limited;
    }

    pub fn is_band_limited(&self) -> bool {
        self.band_limited
    }

    pub fn phase(&self, lane: usize) -> f32 {
        self.phase.get(lane).copied().unwrap_or(0.0)
    }

    pub fn advance(&self, lane: usize) -> f32 {
        self.advance.get(lane).copied().unwrap_or(0.0)
    }

    pub fn pulse_width(&self, lane: usize) -> f32 {
        self.pulse_width.get(lane).copied().unwrap_or(0.5)
    }

    /// Advance the first `active` lanes by one sample. `sync[lane]` resets
    /// that lane's phase to 0 this sample.
    pub fn process(&mut self, active: usize, sync: [bool; LANES], wanted: WaveformSet) -> Waveforms {
        let active = active.min(LANES);
        let correct_saw = self.band_limited && wanted.saw;
        let correct_square = self.band_limited && wanted.square;
        let mut out = Waveforms::default();

        for lane in 0..active {
            let advance = self.advance[lane];
            let pulse_width = self.pulse_width[lane];

            let mut phase = self.phase[lane] + advance;
            phase -= phase.floor();

            if sync[lane] {
                if correct_saw {
                    self.saw_blep
                        .insert_discontinuity(lane, 0.0, naive_saw(0.0) - naive_saw(phase));
                }
                if correct_square {
                    let jump = naive_square(0.0, pulse_width) - naive_square(phase, pulse_width);
                    self.square_blep.insert_discontinuity(lane, 0.0, jump);
                }
                phase = 0.0;
            } else if advance > 0.0 {
                let previous = phase - advance;
                if correct_saw {
                    if let Some(offset) = wrapped_crossing(0.5, previous, advance) {
                        self.saw_blep.insert_discontinuity(lane, offset, -2.0);
                    }
                }
                if correct_square {
                    if let Some(offset) = crossing(0.0, previous, advance) {
                        self.square_blep.insert_discontinuity(lane, offset, 2.0);
                    }
                    if let Some(offset) = wrapped_crossing(pulse_width, previous, advance) {
                        self.square_blep.insert_discontinuity(lane, offset, -2.0);
                    }
                }
            }

            self.phase[lane] = phase;

            if wanted.sine {
                out.sine[lane] = sin_2pi(phase);
            }
            if wanted.saw {
                out.saw[lane] = naive_saw(phase);
            }
            if wanted.triangle {
                out.triangle[lane] = 2.0 * naive_saw(phase).abs() - 1.0;
            }
            if wanted.square {
                out.square[lane] = naive_square(phase, pulse_width);
            }
        }

        if correct_saw {
            let correction = self.saw_blep.process();
            for lane in 0..active {
                out.saw[lane] += correction[lane];
            }
        }
        if correct_square {
            let correction = self.square_blep.process();
            for lane in 0..active {
                out.square[lane] += correction[lane];
            }
        }

        out
    }

    pub fn reset(&mut self) {
        self.phase = [0.0; LANES];
        self.saw_blep.reset();
        self.square_blep.reset();
    }
}

impl Default for OscillatorBank {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn naive_saw(phase: f32) -> f32 {
    let shifted = phase + 0.5;
    2.0 * (shifted - shifted.floor()) - 1.0
}

#[inline]
fn naive_square(phase: f32, pulse_width: f32) -> f32 {
    if phase < pulse_width {
        1.0
    } else {
        -1.0
    }
}

/// Offset in (−1, 0] of a threshold crossing inside the last sample, if any.
#[inline]
fn crossing(threshold: f32, previous: f32, advance: f32) -> Option<f32> {
    let t = (threshold - previous) / advance;
    (t > 0.0 && t <= 1.0).then_some(t - 1.0)
}

/// Like [`crossing`], but also finds a threshold passed before a wrap in
/// the same sample (`previous` < 0, old phase between `threshold` and 1).
#[inline]
fn wrapped_crossing(threshold: f32, previous: f32, advance: f32) -> Option<f32> {
    let before_wrap = if previous < 0.0 {
        crossing(threshold - 1.0, previous, advance)
    } else {
        None
    };
    before_wrap.or_else(|| crossing(threshold, previous, advance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex, Fft, FftPlanner};

    const NO_SYNC: [bool; LANES] = [false; LANES];

    fn mono(bank: &mut OscillatorBank, waveform: Waveform, samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|_| bank.process(1, NO_SYNC, WaveformSet::only(waveform)).get(waveform)[0])
            .collect()
    }

    /// Energy outside the expected harmonic bins, plus the RMS of the signal.
    fn alias_energy(signal: &[f32], harmonics: &[usize]) -> (f32, f32) {
        let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
        let fft: std::sync::Arc<dyn Fft<f32>> = FftPlanner::new().plan_fft_forward(buffer.len());
        fft.process(&mut buffer);
        let alias: f32 = buffer[1..signal.len() / 2]
            .iter()
            .enumerate()
            .filter(|(i, _)| !harmonics.contains(&(i + 1)))
            .map(|(_, bin)| bin.norm_sqr())
            .sum();
        let rms = (signal.iter().map(|s| s * s).sum::<f32>() / signal.len() as f32).sqrt();
        (alias, rms)
    }

    // 37 cycles in 1024 samples: an exact binary fraction, so the phase never
    // drifts and every harmonic lands on a bin.
    const CYCLES: usize = 37;
    const FRAME: usize = 1024;

    fn periodic_frame(band_limited: bool, waveform: Waveform) -> Vec<f32> {
        let mut bank = OscillatorBank::new();
        bank.set_band_limited(band_limited);
        bank.set_frequency(0, CYCLES as f32 / FRAME as f32);
        let signal = mono(&mut bank, waveform, 64 + FRAME);
        signal[64..].to_vec()
    }

    #[test]
    fn phase_tracks_fractional_cycle_count() {
        let mut bank = OscillatorBank::new();
        let f = 0.012_34_f32;
        bank.set_frequency(0, f);
        for n in 1..=2_000usize {
            bank.process(1, NO_SYNC, WaveformSet::default());
            let expected = (n as f64 * f as f64).fract() as f32;
            let diff = (bank.phase(0) - expected).abs();
            assert!(diff.min(1.0 - diff) < 1e-3, "step {n}: {} vs {expected}", bank.phase(0));
        }
    }

    #[test]
    fn middle_c_completes_a_cycle_after_169_samples() {
        let mut bank = OscillatorBank::new();
        let advance = crate::C4_HZ / 44_100.0;
        bank.set_frequency(0, advance);
        for _ in 0..169 {
            bank.process(1, NO_SYNC, WaveformSet::ALL);
        }
        let phase = bank.phase(0);
        assert!(
            phase < advance || phase > 1.0 - advance,
            "phase {phase} is not within one advance of the cycle start"
        );
    }

    #[test]
    fn minblep_square_reduces_aliasing() {
        let naive = periodic_frame(false, Waveform::Square);
        let corrected = periodic_frame(true, Waveform::Square);
        let odd: Vec<usize> = (1..14).step_by(2).map(|k| k * CYCLES).collect();

        let (naive_alias, naive_rms) = alias_energy(&naive, &odd);
        let (blep_alias, blep_rms) = alias_energy(&corrected, &odd);

        assert!(
            blep_alias < 0.1 * naive_alias,
            "alias energy {blep_alias} vs naive {naive_alias}"
        );
        assert!((blep_rms - naive_rms).abs() < 0.1, "rms {blep_rms} vs {naive_rms}");
    }

    #[test]
    fn minblep_saw_reduces_aliasing() {
        let naive = periodic_frame(false, Waveform::Saw);
        let corrected = periodic_frame(true, Waveform::Saw);
        let all: Vec<usize> = (1..14).map(|k| k * CYCLES).collect();

        let (naive_alias, naive_rms) = alias_energy(&naive, &all);
        let (blep_alias, blep_rms) = alias_energy(&corrected, &all);

        assert!(
            blep_alias < 0.1 * naive_alias,
            "alias energy {blep_alias} vs naive {naive_alias}"
        );
        assert!((blep_rms - naive_rms).abs() < 0.05, "rms {blep_rms} vs {naive_rms}");
    }

    #[test]
    fn minblep_narrow_pulse_reduces_aliasing() {
        let frame = |band_limited: bool| {
            let mut bank = OscillatorBank::new();
            bank.set_band_limited(band_limited);
            bank.set_frequency(0, CYCLES as f32 / FRAME as f32);
            bank.set_pulse_width(0, 0.9);
            mono(&mut bank, Waveform::Square, 64 + FRAME)[64..].to_vec()
        };
        let all: Vec<usize> = (1..14).map(|k| k * CYCLES).collect();

        let (naive_alias, naive_rms) = alias_energy(&frame(false), &all);
        let (blep_alias, blep_rms) = alias_energy(&frame(true), &all);

        assert!(
            blep_alias < 0.1 * naive_alias,
            "alias energy {blep_alias} vs naive {naive_alias}"
        );
        assert!((blep_rms - naive_rms).abs() < 0.1, "rms {blep_rms} vs {naive_rms}");
    }

    #[test]
    fn narrow_pulse_keeps_its_dc_level() {
        // Pulse edge and phase wrap often share a sample at these settings.
        for (pulse_width, advance) in [(0.95f32, 0.11f32), (0.99, 0.0173), (0.5, 0.02)] {
            let mut bank = OscillatorBank::new();
            bank.set_frequency(0, advance);
            bank.set_pulse_width(0, pulse_width);
            let signal = mono(&mut bank, Waveform::Square, 50_000);
            let tail = &signal[64..];
            let mean = tail.iter().sum::<f32>() / tail.len() as f32;
            let ideal = 2.0 * pulse_width - 1.0;
            assert!(
                (mean - ideal).abs() < 0.01,
                "pw {pulse_width} advance {advance}: mean {mean}, expected {ideal}"
            );
        }
    }

    #[test]
    fn pulse_edge_before_wrap_is_detected() {
        // Old phase 0.9 + 0.11 wraps to 0.01, passing 0.95 about 0.45 of the way in.
        assert_eq!(crossing(0.95, -0.1, 0.11), None);
        let offset = wrapped_crossing(0.95, -0.1, 0.11);
        assert!(offset.is_some_and(|o| (o + 0.545_454_5).abs() < 1e-5), "{offset:?}");
        // Without a wrap both helpers agree.
        assert_eq!(wrapped_crossing(0.5, 0.45, 0.1), crossing(0.5, 0.45, 0.1));
    }

    #[test]
    fn waveform_shapes_at_known_phases() {
        let mut bank = OscillatorBank::new();
        bank.set_band_limited(false);
        bank.set_frequency(0, 0.25);
        bank.set_pulse_width(0, 0.5);

        // Phases visited: 0.25, 0.5, 0.75, 0.0
        let frames: Vec<Waveforms> = (0..4)
            .map(|_| bank.process(1, NO_SYNC, WaveformSet::ALL))
            .collect();

        assert!((frames[0].sine[0] - 1.0).abs() < 1e-5);
        assert_eq!(frames[0].saw[0], 0.5);
        assert_eq!(frames[0].triangle[0], 0.0);
        assert_eq!(frames[0].square[0], 1.0);

        assert_eq!(frames[1].saw[0], -1.0);
        assert_eq!(frames[1].triangle[0], 1.0);
        assert_eq!(frames[1].square[0], -1.0);

        assert_eq!(frames[3].saw[0], 0.0);
        assert_eq!(frames[3].triangle[0], -1.0);
        assert_eq!(frames[3].square[0], 1.0);
    }

    #[test]
    fn sync_resets_phase_on_the_edge_sample() {
        let mut bank = OscillatorBank::new();
        bank.set_frequency(0, 0.1);
        bank.set_frequency(1, 0.1);
        for _ in 0..3 {
            bank.process(2, NO_SYNC, WaveformSet::ALL);
        }
        assert!((bank.phase(0) - 0.3).abs() < 1e-6);

        bank.process(2, [true, false, false, false], WaveformSet::ALL);
        assert_eq!(bank.phase(0), 0.0);
        assert!((bank.phase(1) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn sync_jump_is_smoothed() {
        let mut bank = OscillatorBank::new();
        bank.set_frequency(0, 0.01);
        for _ in 0..30 {
            bank.process(1, NO_SYNC, WaveformSet::only(Waveform::Saw));
        }
        let before = bank.process(1, NO_SYNC, WaveformSet::only(Waveform::Saw)).saw[0];
        let at_sync = bank
            .process(1, [true, false, false, false], WaveformSet::only(Waveform::Saw))
            .saw[0];
        // The naive saw would drop from ~0.64 to 0 instantly.
        assert!((at_sync - before).abs() < 0.1, "{before} -> {at_sync}");
    }

    #[test]
    fn inactive_lanes_keep_their_state() {
        let mut bank = OscillatorBank::new();
        for lane in 0..LANES {
            bank.set_frequency(lane, 0.05);
        }
        for _ in 0..5 {
            bank.process(LANES, NO_SYNC, WaveformSet::ALL);
        }
        let frozen = bank.phase(3);
        let out = bank.process(2, NO_SYNC, WaveformSet::ALL);
        assert_eq!(bank.phase(3), frozen);
        assert_eq!(out.sine[3], 0.0);
        assert!(bank.phase(0) > frozen);
    }

    #[test]
    fn unrequested_waveforms_stay_silent() {
        let mut bank = OscillatorBank::new();
        bank.set_frequency(0, 0.3);
        for _ in 0..16 {
            let out = bank.process(1, NO_SYNC, WaveformSet::only(Waveform::Sine));
            assert_eq!(out.saw, [0.0; LANES]);
            assert_eq!(out.square, [0.0; LANES]);
            assert_eq!(out.triangle, [0.0; LANES]);
        }
    }

    #[test]
    fn parameters_are_clamped() {
        let mut bank = OscillatorBank::new();
        bank.set_frequency(0, 3.0);
        bank.set_frequency(1, -1.0);
        bank.set_pulse_width(0, 0.0);
        bank.set_pulse_width(1, 1.0);
        assert_eq!(bank.advance(0), MAX_ADVANCE);
        assert_eq!(bank.advance(1), 0.0);
        assert_eq!(bank.pulse_width(0), MIN_PULSE_WIDTH);
        assert_eq!(bank.pulse_width(1), MAX_PULSE_WIDTH);
    }
}
