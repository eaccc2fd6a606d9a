//! Step grid widget - the pattern editor.
//!
//! Renders one row per track and one double-width cell per step, and
//! reports its cell geometry back so mouse coordinates can be mapped to
//! (track, step) for painting.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gridbeat::machine::MachineSnapshot;

/// Columns reserved for track names.
const LABEL_WIDTH: u16 = 7;
/// Columns per step cell (glyph + gap).
const CELL_WIDTH: u16 = 3;

const TRACK_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Cyan, Color::Magenta];

/// Where the grid cells ended up on screen, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridGeometry {
    inner: Rect,
    tracks: usize,
    steps: usize,
}

impl GridGeometry {
    /// Map a terminal coordinate to a grid cell, if it lands on one.
    pub fn hit(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        // Row 0 of the inner area is the step-number header
        let track = y
            .checked_sub(self.inner.y + 1)
            .map(usize::from)
            .filter(|&t| t < self.tracks)?;
        let step = x
            .checked_sub(self.inner.x + LABEL_WIDTH)
            .map(|rel| usize::from(rel / CELL_WIDTH))
            .filter(|&s| s < self.steps)?;
        Some((track, step))
    }
}

pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    snapshot: &MachineSnapshot,
    selected_track: usize,
) -> GridGeometry {
    let block = Block::default().title(" Pattern ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::with_capacity(snapshot.tracks.len() + 1);

    // Step-number header, 1-based, downbeats emphasized
    let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH as usize))];
    for step in 0..snapshot.steps {
        let style = if step % 4 == 0 {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header.push(Span::styled(format!("{:<3}", step + 1), style));
    }
    lines.push(Line::from(header));

    for (track, info) in snapshot.tracks.iter().enumerate() {
        let color = TRACK_COLORS[track % TRACK_COLORS.len()];
        let name_style = if track == selected_track {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = vec![Span::styled(
            format!("{:<width$}", info.name, width = LABEL_WIDTH as usize),
            name_style,
        )];

        for (step, &active) in info.cells.iter().enumerate() {
            let playhead = snapshot.playing && step == snapshot.current_step;
            let mut style = if active {
                let cell_color = if info.audible { color } else { Color::DarkGray };
                Style::default().fg(cell_color)
            } else if step % 4 == 0 {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if playhead {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let glyph = if active { "██ " } else { "·· " };
            spans.push(Span::styled(glyph, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    GridGeometry {
        inner,
        tracks: snapshot.tracks.len(),
        steps: snapshot.steps,
    }
}
