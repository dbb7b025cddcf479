//! Status bar widget - patch settings, envelope lights, VCA meter and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use modsynth_dsp::modules::FilterMode;

use super::state::PatchStatus;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Scientific pitch name of a MIDI note (60 = C4).
fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

fn light(on: bool, label: &'static str) -> Span<'static> {
    let color = if on { Color::Red } else { Color::DarkGray };
    Span::styled(label, Style::default().fg(color))
}

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, status: &PatchStatus, audio_stats: &AudioStats) {
    let block = Block::default().title(" modsynth ").borders(Borders::ALL);

    let gate_symbol = if status.gate { "●" } else { "○" };
    let mode = match status.mode {
        FilterMode::Iir => "IIR",
        FilterMode::Fir => "FIR",
    };
    let meter: String = status
        .meter
        .iter()
        .map(|&lit| if lit { '▮' } else { '▯' })
        .collect();

    let settings = Line::from(vec![
        Span::styled(
            format!(" {} {:<4} ", gate_symbol, note_name(status.note)),
            Style::default().fg(if status.gate { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!("{:?}  ", status.waveform),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {:>7.0} Hz  ", mode, status.cutoff_hz),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Noise {:>3.0}%  ", status.noise_mix * 100.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz", status.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let levels = Line::from(vec![
        Span::raw(" "),
        light(status.lights.attack, "A "),
        light(status.lights.decay, "D "),
        light(status.lights.sustain, "S "),
        light(status.lights.release, "R "),
        Span::styled(
            format!(" Env {:>4.1} V  ", status.envelope),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{meter}  "), Style::default().fg(Color::Green)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![settings, levels]).block(block);
    frame.render_widget(paragraph, area);
}
