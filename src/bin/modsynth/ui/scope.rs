//! Oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Samples shown on screen; the rest of the buffer is used to find a trigger.
const SCOPE_WINDOW: usize = 512;

/// Index of the first rising zero crossing that leaves a full window after it.
fn trigger_point(buffer: &[f32]) -> usize {
    let last_start = buffer.len().saturating_sub(SCOPE_WINDOW);
    buffer
        .windows(2)
        .take(last_start)
        .position(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
        .map_or(0, |i| i + 1)
}

/// Render the audio output, triggered on a rising zero crossing
pub fn render_scope(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let start = trigger_point(audio_buffer);
    let window = &audio_buffer[start..audio_buffer.len().min(start + SCOPE_WINDOW)];

    let data: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / SCOPE_WINDOW as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
