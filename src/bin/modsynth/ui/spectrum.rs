//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the scope buffer, sampled at log-spaced frequencies
//! and drawn on a log-frequency axis.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Number of frequency points to display
const SPECTRUM_BINS: usize = 64;
const MIN_FREQ_HZ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// log10 of the frequency of each display point
    log_freqs: Vec<f64>,
    /// FFT bin sampled for each display point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude in dB relative to a full-scale sine)
    spectrum: Vec<(f64, f64)>,
    reference_power: f32,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to `update`.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    0.5 * (1.0 - (2.0 * PI * i as f32 / (buffer_len - 1) as f32).cos())
                } else {
                    1.0
                }
            })
            .collect();

        // A full-scale sine lands half the window's sum in its bin.
        let coherent_gain = 0.5 * window.iter().sum::<f32>();
        let reference_power = (coherent_gain * coherent_gain).max(1e-12);

        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ_HZ + 1.0);
        let ratio = (max_freq / MIN_FREQ_HZ) as f64;
        let half = (buffer_len / 2).max(1);

        let mut log_freqs = Vec::with_capacity(SPECTRUM_BINS);
        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ_HZ as f64 * ratio.powf(t);
            let index = ((freq * buffer_len as f64 / sample_rate as f64).round() as usize).min(half - 1);
            log_freqs.push(freq.log10());
            bin_indices.push(index);
        }

        let spectrum = log_freqs.iter().map(|&f| (f, FLOOR_DB)).collect();

        Self {
            window,
            log_freqs,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            reference_power,
        }
    }

    /// Recompute from the latest samples. Buffers of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((point, &index), &log_freq) in self
            .spectrum
            .iter_mut()
            .zip(&self.bin_indices)
            .zip(&self.log_freqs)
        {
            let power = self.scratch[index].norm_sqr().max(1e-12);
            let db = 10.0 * ((power / self.reference_power) as f64).log10();
            *point = (log_freq, db.max(FLOOR_DB));
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum analyzer widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let min_x = spectrum.first().map_or(1.0, |(f, _)| *f);
    let max_x = spectrum.last().map_or(4.3, |(f, _)| *f).max(min_x + 0.1);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
