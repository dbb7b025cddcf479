//! Edge detectors for gates, triggers and oscillator sync.

/// Voltage at or above which a trigger input is considered high.
pub const TRIGGER_HIGH: f32 = 1.0;
/// Voltage at or below which a high trigger input falls back low.
pub const TRIGGER_LOW: f32 = 0.1;

/// Rising-edge detector with hysteresis.
///
/// The input must reach [`TRIGGER_HIGH`] to fire and drop to [`TRIGGER_LOW`]
/// before it can fire again, so noisy gates produce a single edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchmittTrigger {
    high: bool,
}

impl SchmittTrigger {
    pub fn new() -> Self {
        Self { high: false }
    }

    /// Returns `true` on the sample the input crosses into the high state.
    #[inline]
    pub fn process(&mut self, voltage: f32) -> bool {
        if self.high {
            if voltage <= TRIGGER_LOW {
                self.high = false;
            }
            false
        } else if voltage >= TRIGGER_HIGH {
            self.high = true;
            true
        } else {
            false
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn reset(&mut self) {
        self.high = false;
    }
}

/// Zero-crossing detector for hard sync: fires when the input goes from
/// negative to non-negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncDetector {
    last: f32,
}

impl SyncDetector {
    pub fn new() -> Self {
        Self { last: 0.0 }
    }

    #[inline]
    pub fn process(&mut self, voltage: f32) -> bool {
        let edge = self.last < 0.0 && voltage >= 0.0;
        self.last = voltage;
        edge
    }

    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}
