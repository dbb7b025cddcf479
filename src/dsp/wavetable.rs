//! Editable single-cycle lookup table.
//!
//! The table holds samples in [0, 1] and is read at a phase in [0, 1) with
//! the 4-point polynomial from Pure Data's `tabread4~`. Neighbouring taps are
//! clamped at the table edges rather than wrapped, so the first and last
//! samples are held flat. The polynomial reproduces straight lines exactly.
//!
//! Editing (`set`, `draw_line`, `resize`) is meant for the UI thread; the
//! audio path only calls [`Wavetable::read`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the default ramp table.
pub const DEFAULT_TABLE_LEN: usize = 1000;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// A rising ramp from 0 to 1 over [`DEFAULT_TABLE_LEN`] samples.
    pub fn ramp() -> Self {
        let last = (DEFAULT_TABLE_LEN - 1) as f32;
        Self {
            samples: (0..DEFAULT_TABLE_LEN).map(|i| i as f32 / last).collect(),
        }
    }

    /// Values are clamped to [0, 1]; an empty input becomes a single 0.
    pub fn from_samples(samples: Vec<f32>) -> Self {
        let mut samples: Vec<f32> = samples.into_iter().map(clamp_unit).collect();
        if samples.is_empty() {
            samples.push(0.0);
        }
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: a table holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Overwrite one sample. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(sample) = self.samples.get_mut(index) {
            *sample = clamp_unit(value);
        }
    }

    /// Fill `from..=to` with a straight line between the two values, the way a
    /// mouse drag across several cells is drawn. Indices are clamped to the table.
    pub fn draw_line(&mut self, from: usize, from_value: f32, to: usize, to_value: f32) {
        let last = self.samples.len() - 1;
        let (mut i1, mut y1, mut i2, mut y2) = (from.min(last), from_value, to.min(last), to_value);
        if i2 < i1 {
            std::mem::swap(&mut i1, &mut i2);
            std::mem::swap(&mut y1, &mut y2);
        }
        if i1 == i2 {
            self.set(i2, y2);
            return;
        }
        let span = (i2 - i1) as f32;
        for (offset, sample) in self.samples[i1..=i2].iter_mut().enumerate() {
            *sample = clamp_unit(y1 + offset as f32 / span * (y2 - y1));
        }
    }

    /// Change the table length, filling new cells with 0. A length of 0 is raised to 1.
    pub fn resize(&mut self, len: usize) {
        self.samples.resize(len.max(1), 0.0);
    }

    /// Interpolated value at `phase` (expected in [0, 1)).
    #[inline]
    pub fn read(&self, phase: f32) -> f32 {
        let size = self.samples.len();
        let last = size as isize - 1;
        let position = phase * size as f32;
        let i = (position.floor() as isize).clamp(0, last);
        let tap = |offset: isize| self.samples[(i + offset).clamp(0, last) as usize];
        let (a, b, c, d) = (tap(-1), tap(0), tap(1), tap(2));

        let frac = position - i as f32;
        b + frac
            * (c - b
                - 0.166_666_7
                    * (1.0 - frac)
                    * ((d - a - 3.0 * (c - b)) * frac + (d + 2.0 * a - 3.0 * b)))
    }
}

impl Default for Wavetable {
    fn default() -> Self {
        Self::ramp()
    }
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
