//! Transport bar widget - BPM, play state, position, and bus stats.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gridbeat::machine::MachineSnapshot;

/// Master bus statistics for display.
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    snapshot: &MachineSnapshot,
    stats: &AudioStats,
) {
    let block = Block::default().title(" gridbeat ").borders(Borders::ALL);

    let play_symbol = if snapshot.playing { "▶" } else { "■" };
    let play_state = if snapshot.playing { "Playing" } else { "Stopped" };

    // 16 sixteenths to the bar: show beat.sixteenth
    let beat = snapshot.current_step / 4 + 1;
    let sixteenth = snapshot.current_step % 4 + 1;

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", snapshot.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{play_symbol} {play_state}  "),
            Style::default().fg(if snapshot.playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!(
                "Step {:>2}/{}  ({beat}.{sixteenth})  ",
                snapshot.current_step + 1,
                snapshot.steps
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Master: {:+.1} dB  ", snapshot.master_db),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
