//! modsynth - play a small VCO → VCF → VCA patch from the terminal
//!
//! Run with: cargo run --bin modsynth

mod app;
mod patch;
mod ui;

use app::Modsynth;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Modsynth::new().note(57).cutoff(1_200.0).run()
}
