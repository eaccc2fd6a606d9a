//! Spectrum analyzer widget.
//!
//! Hann-windowed FFT of the master tap, sampled at log-spaced
//! frequencies so kick and hihat both get visual room.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

const DISPLAY_BINS: usize = 48;
const FLOOR_DB: f64 = -100.0;

pub struct Spectrum {
    window: Vec<f32>,
    /// (display frequency in Hz, FFT bin index) per display point.
    bins: Vec<(f64, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    data: Vec<(f64, f64)>,
}

impl Spectrum {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        // Hann window keeps percussive transients from smearing the plot
        let denom = fft_size.saturating_sub(1).max(1) as f32;
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        // Log-spaced points from 20 Hz up to Nyquist (capped at 20 kHz)
        let half = (fft_size / 2).max(1);
        let min_freq = 20.0f64;
        let max_freq = (sample_rate as f64 / 2.0).min(20_000.0).max(min_freq + 1.0);
        let ratio = max_freq / min_freq;
        let bins: Vec<(f64, usize)> = (0..DISPLAY_BINS)
            .map(|i| {
                let t = i as f64 / (DISPLAY_BINS - 1) as f64;
                let freq = min_freq * ratio.powf(t);
                let index = ((freq * fft_size as f64 / sample_rate as f64).round() as usize)
                    .min(half - 1);
                (freq, index)
            })
            .collect();

        let data = bins.iter().map(|&(f, _)| (f, FLOOR_DB)).collect();

        Self {
            window,
            bins,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            data,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for (slot, (&sample, &w)) in self.scratch.iter_mut().zip(buffer.iter().zip(&self.window)) {
            slot.re = sample * w;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        for (point, &(freq, index)) in self.data.iter_mut().zip(&self.bins) {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12) as f64;
            *point = (freq, (10.0 * power.log10()).max(FLOOR_DB));
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.data
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_freq = spectrum.iter().map(|(f, _)| *f).fold(1.0, f64::max);
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(0.0, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_freq])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
