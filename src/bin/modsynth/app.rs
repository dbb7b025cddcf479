//! Modsynth - audio device setup and the audio callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use super::patch::Patch;
use super::ui::state::{ControlMessage, PatchStatus};
use super::ui::{UiApp, VIS_BUFFER_SIZE};

/// Pending key commands the audio thread can fall behind by
const CONTROL_QUEUE: usize = 64;
/// Patch snapshots published per second, roughly
const STATUS_RATE_HZ: f32 = 60.0;

/// Application builder
pub struct Modsynth {
    note: u8,
    cutoff_hz: f32,
}

impl Modsynth {
    pub fn new() -> Self {
        Self {
            note: 60,
            cutoff_hz: 1_000.0,
        }
    }

    /// Starting MIDI note
    pub fn note(mut self, note: u8) -> Self {
        self.note = note;
        self
    }

    /// Starting filter cutoff in Hz
    pub fn cutoff(mut self, cutoff_hz: f32) -> Self {
        self.cutoff_hz = cutoff_hz;
        self
    }

    /// Open the default output device, start the patch and run the TUI until quit
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = (config.channels() as usize).max(1);

        println!("=== modsynth ===");
        println!("Device: {}", device.name().unwrap_or_else(|_| "unknown".into()));
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!();

        let mut patch = Patch::new(sample_rate);
        patch.set_note(self.note);
        patch.set_cutoff(self.cutoff_hz);
        let initial_status = patch.status();

        let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
        let (mut status_tx, status_rx) = RingBuffer::<PatchStatus>::new(4);
        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);

        let status_interval = (sample_rate / STATUS_RATE_HZ).max(1.0) as usize;
        let mut frames_since_status = 0usize;

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    while let Ok(message) = control_rx.pop() {
                        patch.apply(message);
                    }

                    for frame in data.chunks_mut(channels) {
                        let sample = patch.next_sample();
                        frame.fill(sample);
                        // The scope only needs recent samples; drop them when the UI lags.
                        let _ = audio_tx.push(sample);
                    }

                    frames_since_status += data.len() / channels;
                    if frames_since_status >= status_interval {
                        frames_since_status = 0;
                        let _ = status_tx.push(patch.status());
                    }
                },
                |err| eprintln!("Audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(audio_rx, status_rx, control_tx, initial_status).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

impl Default for Modsynth {
    fn default() -> Self {
        Self::new()
    }
}
