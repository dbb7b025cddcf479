//! TUI for modsynth
//!
//! Shows the patch status, an oscilloscope and a spectrum of the audio
//! output, and turns key presses into control messages for the audio thread.

mod scope;
mod spectrum;
pub mod state;
mod status;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use scope::render_scope;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::{ControlMessage, PatchStatus};
use status::{render_status, AudioStats};

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Cutoff step for the arrow keys (a sixth of an octave).
const CUTOFF_STEP: f32 = 1.122_462;

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for patch snapshots
    status_rx: Consumer<PatchStatus>,
    /// Ring buffer sender for key commands
    control_tx: Producer<ControlMessage>,
    current_status: PatchStatus,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        audio_rx: Consumer<f32>,
        status_rx: Consumer<PatchStatus>,
        control_tx: Producer<ControlMessage>,
        initial_status: PatchStatus,
    ) -> Self {
        Self {
            audio_rx,
            status_rx,
            control_tx,
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, initial_status.sample_rate),
            current_status: initial_status,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    /// Keep only the latest snapshot
    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.current_status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let message = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => ControlMessage::ToggleGate,
            KeyCode::Char('r') => ControlMessage::Retrigger,
            KeyCode::Up => ControlMessage::Transpose(1),
            KeyCode::Down => ControlMessage::Transpose(-1),
            KeyCode::Right => ControlMessage::ScaleCutoff(CUTOFF_STEP),
            KeyCode::Left => ControlMessage::ScaleCutoff(1.0 / CUTOFF_STEP),
            KeyCode::Char('f') => ControlMessage::ToggleFilterMode,
            KeyCode::Char('w') => ControlMessage::NextWaveform,
            KeyCode::Char('n') => ControlMessage::CycleNoise,
            _ => return,
        };
        // A full queue drops the key press; the audio thread drains it every block.
        let _ = self.control_tx.push(message);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Status bar
                Constraint::Min(6),    // Scope
                Constraint::Min(6),    // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(frame, chunks[0], &self.current_status, &stats);
        render_scope(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(
            " [Space] Gate  [R] Retrigger  [↑↓] Pitch  [←→] Cutoff  [F] Filter  [W] Wave  [N] Noise  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
