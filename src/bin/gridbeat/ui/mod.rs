//! TUI for the drum machine.
//!
//! The UI thread owns the terminal and a consumer end of the master-bus
//! tap ring. Every frame it drains the tap, takes a snapshot of the
//! machine under the state lock, and redraws. Edits (keys and mouse
//! painting) lock the machine briefly and return.

mod grid;
mod mixer;
mod spectrum;
mod transport;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gridbeat::machine::MachineSnapshot;
use gridbeat::sequencing::PaintGesture;
use gridbeat::DrumMachine;

use grid::GridGeometry;
use spectrum::Spectrum;
use transport::AudioStats;

/// Samples kept for the scope and spectrum (also the FFT size).
const VIS_BUFFER_SIZE: usize = 1024;

const TEMPO_STEP: f32 = 5.0;
const VOLUME_STEP_DB: f32 = 1.0;

pub struct UiApp {
    machine: Arc<Mutex<DrumMachine>>,
    tap_rx: Consumer<f32>,

    snapshot: MachineSnapshot,
    audio_buffer: Vec<f32>,
    spectrum: Spectrum,

    selected_track: usize,
    /// In-progress mouse paint, if any. Cleared on button release.
    gesture: Option<PaintGesture>,
    grid_geometry: GridGeometry,

    should_quit: bool,
}

impl UiApp {
    pub fn new(machine: Arc<Mutex<DrumMachine>>, tap_rx: Consumer<f32>, sample_rate: f32) -> Self {
        let snapshot = machine
            .lock()
            .map(|m| m.snapshot())
            .unwrap_or_else(|_| MachineSnapshot {
                playing: false,
                bpm: 120.0,
                current_step: 0,
                steps: 0,
                master_db: 0.0,
                master_meter: 0.0,
                tracks: Vec::new(),
            });

        Self {
            machine,
            tap_rx,
            snapshot,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: Spectrum::new(VIS_BUFFER_SIZE, sample_rate),
            selected_track: 0,
            gesture: None,
            grid_geometry: GridGeometry::default(),
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        execute!(stdout(), EnableMouseCapture)?;
        let result = self.event_loop(&mut terminal);
        execute!(stdout(), DisableMouseCapture)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.refresh_snapshot();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking input at ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code);
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Drain the tap ring, keeping the newest `VIS_BUFFER_SIZE` samples.
    fn poll_audio(&mut self) {
        let mut drained = false;
        while let Ok(sample) = self.tap_rx.pop() {
            self.audio_buffer.push(sample);
            drained = true;
        }
        if drained && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn refresh_snapshot(&mut self) {
        if let Ok(machine) = self.machine.lock() {
            self.snapshot = machine.snapshot();
        }
    }

    fn with_machine(&self, f: impl FnOnce(&mut DrumMachine)) {
        if let Ok(mut machine) = self.machine.lock() {
            f(&mut machine);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let track = self.selected_track;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.with_machine(|m| m.toggle_play()),
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.with_machine(|m| m.set_bpm(m.bpm() - TEMPO_STEP))
            }
            KeyCode::Char('=') | KeyCode::Char('+') => {
                self.with_machine(|m| m.set_bpm(m.bpm() + TEMPO_STEP))
            }
            KeyCode::Up => {
                self.selected_track = self.selected_track.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = self.snapshot.tracks.len().saturating_sub(1);
                self.selected_track = (self.selected_track + 1).min(last);
            }
            KeyCode::Char('m') => self.with_machine(|m| m.toggle_mute(track)),
            KeyCode::Char('s') => self.with_machine(|m| m.toggle_solo(track)),
            KeyCode::Char('[') => self.with_machine(|m| m.adjust_volume_db(track, -VOLUME_STEP_DB)),
            KeyCode::Char(']') => self.with_machine(|m| m.adjust_volume_db(track, VOLUME_STEP_DB)),
            KeyCode::Char('{') => self.with_machine(|m| m.adjust_master_db(-VOLUME_STEP_DB)),
            KeyCode::Char('}') => self.with_machine(|m| m.adjust_master_db(VOLUME_STEP_DB)),
            KeyCode::Char('c') => self.with_machine(|m| m.clear_grid()),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((track, step)) = self.grid_geometry.hit(mouse.column, mouse.row) {
                    self.selected_track = track;
                    let mut gesture = None;
                    self.with_machine(|m| gesture = Some(m.begin_paint(track, step)));
                    self.gesture = gesture;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(gesture), Some((track, step))) =
                    (self.gesture, self.grid_geometry.hit(mouse.column, mouse.row))
                {
                    self.with_machine(|m| m.paint(gesture, track, step));
                }
            }
            // Release anywhere ends the gesture
            MouseEventKind::Up(_) => self.gesture = None,
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let tracks = self.snapshot.tracks.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),          // Transport bar
                Constraint::Length(tracks + 3), // Step grid
                Constraint::Length(tracks + 2), // Mixer
                Constraint::Min(8),             // Spectrum
                Constraint::Length(1),          // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        transport::render_transport(frame, chunks[0], &self.snapshot, &stats);

        self.grid_geometry =
            grid::render_grid(frame, chunks[1], &self.snapshot, self.selected_track);

        mixer::render_mixer(frame, chunks[2], &self.snapshot, self.selected_track);
        spectrum::render_spectrum(frame, chunks[3], self.spectrum.data());

        let help = Paragraph::new(
            " [Space] Play/Stop  [Click/Drag] Paint  [-/+] Tempo  [↑/↓] Track  \
             [M]ute [S]olo  [[/]] Volume  [{/}] Master  [C]lear  [Q]uit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
