pub mod dsp; // Allocation-free signal primitives
pub mod io; // Host contract: render context and polyphonic ports
pub mod modules; // Per-sample synthesizer modules

/// Maximum number of simultaneous voices on a polyphonic bus.
pub const MAX_POLYPHONY: usize = 16;

/// Frequency produced at 0 V on a 1V/octave input with the pitch knob at its default.
pub const C4_HZ: f32 = 261.626;
