//! Module-level benchmarks.
//!
//! These patch the modules' ports the way a host would and render whole
//! blocks, including control-rate updates and polyphony.

mod modules;
mod patch;

pub use modules::bench_modules;
pub use patch::bench_patch;
