//! Mixer widget - one channel strip per track plus post-fader meters.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gridbeat::machine::MachineSnapshot;

const METER_WIDTH: usize = 24;

pub fn render_mixer(
    frame: &mut Frame,
    area: Rect,
    snapshot: &MachineSnapshot,
    selected_track: usize,
) {
    let block = Block::default().title(" Mixer ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .tracks
        .iter()
        .enumerate()
        .map(|(track, info)| {
            let marker = if track == selected_track { "▶" } else { " " };
            let name_style = if info.audible {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let mute_style = if info.muted {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let solo_style = if info.soloed {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let filled = ((info.meter.clamp(0.0, 1.0) * METER_WIDTH as f32) as usize)
                .min(METER_WIDTH);
            let meter = format!("{}{}", "█".repeat(filled), "░".repeat(METER_WIDTH - filled));
            let meter_color = if filled > METER_WIDTH * 3 / 4 {
                Color::Red
            } else {
                Color::Green
            };

            Line::from(vec![
                Span::styled(format!(" {marker} "), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:<7}", info.name), name_style),
                Span::styled(
                    format!("{:+6.1} dB  ", info.volume_db),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("[M]", mute_style),
                Span::raw(" "),
                Span::styled("[S]", solo_style),
                Span::raw("  "),
                Span::styled(meter, Style::default().fg(meter_color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
