//! Control-rate scheduling.
//!
//! Knob positions, pitch CV and pulse width change slowly compared to the
//! audio rate, so modules recompute them once per `division` samples instead
//! of every sample. Audio-rate modulation of those inputs is therefore
//! sampled at the reduced rate and may alias.

/// Number of samples between control updates used by the oscillator modules.
pub const CONTROL_DIVISION: u32 = 4;

#[derive(Debug, Clone, Copy)]
pub struct ControlDivider {
    division: u32,
    counter: u32,
}

impl ControlDivider {
    pub fn new(division: u32) -> Self {
        Self {
            division: division.max(1),
            counter: 0,
        }
    }

    /// Advance by one sample. Returns `true` on the first call and then on
    /// every `division`-th call after it.
    #[inline]
    pub fn tick(&mut self) -> bool {
        let fire = self.counter == 0;
        self.counter += 1;
        if self.counter >= self.division {
            self.counter = 0;
        }
        fire
    }

    pub fn division(&self) -> u32 {
        self.division
    }

    /// Fire again on the next tick.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

impl Default for ControlDivider {
    fn default() -> Self {
        Self::new(CONTROL_DIVISION)
    }
}
