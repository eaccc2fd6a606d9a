use crate::dsp::gain::{apply_gain, db_to_linear, limit_hard, peak, sum_in_place};
use crate::graph::{GraphNode, RenderCtx};
use crate::mixer::{Mixer, TrackStrip};
use crate::sequencing::{PaintGesture, StepEvent, StepGrid, Transport};
use crate::voices;
use crate::MAX_BLOCK_SIZE;

/*
Drum Machine
============

The engine that ties the pieces together. Per audio block:

  1. The transport reports which step boundaries fall inside the block
     and at which frame offset.
  2. Rendering is segmented at those offsets. At each boundary, every
     track whose grid cell is active at that step gets its voice
     triggered - simultaneous hits land on the same frame.
  3. Each sounding voice renders into a scratch buffer, is scaled by its
     track gain (zero when the mixer resolves it inaudible), and is
     summed onto the master bus.
  4. The master fader is applied and the bus is hard-limited at -1 dBFS.

Everything here is allocation-free after construction: scratch buffers
and the event list are sized up front, so render_block is safe to call
from the audio callback.
*/

/// Master bus ceiling: -1 dBFS.
const LIMITER_CEILING_DB: f32 = -1.0;

/// Per-block decay applied to peak meters so they fall smoothly.
const METER_DECAY: f32 = 0.92;

pub const DEFAULT_STEPS: usize = 16;

/// Everything the UI needs to draw one frame. Built under the state lock,
/// consumed without it.
#[derive(Debug, Clone)]
pub struct MachineSnapshot {
    pub playing: bool,
    pub bpm: f32,
    pub current_step: usize,
    pub steps: usize,
    pub master_db: f32,
    pub master_meter: f32,
    pub tracks: Vec<TrackSnapshot>,
}

#[derive(Debug, Clone)]
pub struct TrackSnapshot {
    pub name: String,
    pub volume_db: f32,
    pub muted: bool,
    pub soloed: bool,
    pub audible: bool,
    pub meter: f32,
    pub cells: Vec<bool>,
}

pub struct DrumMachine {
    sample_rate: f32,
    grid: StepGrid,
    transport: Transport,
    mixer: Mixer,
    voices: Vec<Box<dyn GraphNode>>,

    // Render scratch, sized once
    events: Vec<StepEvent>,
    track_buf: Vec<f32>,

    meters: Vec<f32>,
    master_meter: f32,
}

impl DrumMachine {
    /// Build a machine from (strip, voice) pairs.
    pub fn new(sample_rate: f32, steps: usize, tracks: Vec<(TrackStrip, Box<dyn GraphNode>)>) -> Self {
        let count = tracks.len();
        let (strips, voices): (Vec<_>, Vec<_>) = tracks.into_iter().unzip();

        Self {
            sample_rate,
            grid: StepGrid::new(count, steps),
            transport: Transport::new(sample_rate, steps),
            mixer: Mixer::new(strips),
            voices,
            events: Vec::with_capacity(steps),
            track_buf: vec![0.0; MAX_BLOCK_SIZE],
            meters: vec![0.0; count],
            master_meter: 0.0,
        }
    }

    /// The standard four-piece kit: kick, snare, hihat (trimmed -8 dB, as
    /// bright noise reads louder than it meters), clap.
    pub fn with_default_kit(sample_rate: f32) -> Self {
        Self::new(
            sample_rate,
            DEFAULT_STEPS,
            vec![
                (TrackStrip::new("KICK"), Box::new(voices::kick())),
                (TrackStrip::new("SNARE"), Box::new(voices::snare())),
                (
                    TrackStrip::new("HIHAT").with_volume_db(-8.0),
                    Box::new(voices::hihat()),
                ),
                (TrackStrip::new("CLAP"), Box::new(voices::clap())),
            ],
        )
    }

    // ── Transport ────────────────────────────────────────────────

    pub fn toggle_play(&mut self) {
        self.transport.toggle();
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.transport.set_bpm(bpm);
    }

    pub fn bpm(&self) -> f32 {
        self.transport.bpm()
    }

    pub fn current_step(&self) -> usize {
        self.transport.current_step()
    }

    // ── Grid editing ─────────────────────────────────────────────

    pub fn grid(&self) -> &StepGrid {
        &self.grid
    }

    pub fn begin_paint(&mut self, track: usize, step: usize) -> PaintGesture {
        self.grid.begin_paint(track, step)
    }

    pub fn paint(&mut self, gesture: PaintGesture, track: usize, step: usize) {
        self.grid.paint(gesture, track, step);
    }

    pub fn clear_grid(&mut self) {
        self.grid.clear();
    }

    // ── Mixer ────────────────────────────────────────────────────

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn toggle_mute(&mut self, track: usize) {
        self.mixer.toggle_mute(track);
    }

    pub fn toggle_solo(&mut self, track: usize) {
        self.mixer.toggle_solo(track);
    }

    pub fn adjust_volume_db(&mut self, track: usize, delta_db: f32) {
        self.mixer.adjust_volume_db(track, delta_db);
    }

    pub fn adjust_master_db(&mut self, delta_db: f32) {
        self.mixer.adjust_master_db(delta_db);
    }

    pub fn tracks(&self) -> usize {
        self.voices.len()
    }

    // ── Rendering ────────────────────────────────────────────────

    /// Render one mono block. Blocks larger than `MAX_BLOCK_SIZE` are
    /// processed in chunks, so any callback size is fine.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let frames = out.len();
        if frames == 0 {
            return;
        }

        let mut events = std::mem::take(&mut self.events);
        self.transport.process(frames, &mut events);

        // Segment the block at step boundaries so triggers are
        // sample-accurate.
        let mut cursor = 0;
        for event in &events {
            if event.offset > cursor {
                self.render_span(out, cursor, event.offset);
                cursor = event.offset;
            }
            self.dispatch_step(event.step);
        }
        self.render_span(out, cursor, frames);
        self.events = events;

        // Master bus: fader, then limiter
        apply_gain(out, self.mixer.master_gain());
        limit_hard(out, db_to_linear(LIMITER_CEILING_DB));
        self.master_meter = (self.master_meter * METER_DECAY).max(peak(out));
    }

    /// Fire every voice whose grid cell is active at this step.
    fn dispatch_step(&mut self, step: usize) {
        let ctx = RenderCtx::from_freq(self.sample_rate, 440.0, 1.0);
        for track in self.grid.active_tracks_at(step) {
            self.voices[track].trigger(&ctx);
        }
    }

    /// Render all sounding voices into `out[start..end]` through their
    /// track gains.
    fn render_span(&mut self, out: &mut [f32], start: usize, end: usize) {
        if start >= end {
            return;
        }
        let span = &mut out[start..end];
        let ctx = RenderCtx::from_freq(self.sample_rate, 440.0, 1.0);

        for (track, voice) in self.voices.iter_mut().enumerate() {
            if !voice.is_active() {
                self.meters[track] *= METER_DECAY;
                continue;
            }

            let scratch = &mut self.track_buf[..span.len()];
            scratch.fill(0.0);
            voice.render_block(scratch, &ctx);

            let gain = self.mixer.track_gain(track);
            apply_gain(scratch, gain);
            self.meters[track] = (self.meters[track] * METER_DECAY).max(peak(scratch));
            sum_in_place(span, scratch);
        }
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            playing: self.transport.is_playing(),
            bpm: self.transport.bpm(),
            current_step: self.transport.current_step(),
            steps: self.grid.steps(),
            master_db: self.mixer.master_db(),
            master_meter: self.master_meter,
            tracks: (0..self.voices.len())
                .map(|track| {
                    let strip = self.mixer.strip(track);
                    TrackSnapshot {
                        name: strip.name.clone(),
                        volume_db: strip.volume_db,
                        muted: strip.muted,
                        soloed: strip.soloed,
                        audible: self.mixer.is_audible(track),
                        meter: self.meters[track],
                        cells: (0..self.grid.steps())
                            .map(|step| self.grid.get(track, step))
                            .collect(),
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;
    const BLOCK: usize = 512;

    fn render_seconds(machine: &mut DrumMachine, seconds: f32) -> Vec<f32> {
        let total = (seconds * SAMPLE_RATE) as usize;
        let mut out = Vec::with_capacity(total);
        let mut block = vec![0.0f32; BLOCK];
        let mut rendered = 0;
        while rendered < total {
            machine.render_block(&mut block);
            out.extend_from_slice(&block);
            rendered += BLOCK;
        }
        out
    }

    fn peak_of(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }

    fn four_on_floor(machine: &mut DrumMachine) {
        for step in [0, 4, 8, 12] {
            machine.begin_paint(0, step);
        }
    }

    #[test]
    fn stopped_machine_renders_silence() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine);

        let out = render_seconds(&mut machine, 0.5);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn playing_pattern_makes_sound_within_the_limiter() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine);
        machine.toggle_play();

        let out = render_seconds(&mut machine, 2.0);
        let peak = peak_of(&out);
        assert!(peak > 0.05, "expected audible output, got peak {peak}");
        assert!(
            peak <= db_to_linear(LIMITER_CEILING_DB) + 1e-6,
            "limiter ceiling exceeded: {peak}"
        );
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn empty_grid_plays_silence() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        machine.toggle_play();

        let out = render_seconds(&mut machine, 1.0);
        assert_eq!(peak_of(&out), 0.0);
    }

    #[test]
    fn muted_track_is_silent() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine);
        machine.toggle_mute(0);
        machine.toggle_play();

        let out = render_seconds(&mut machine, 1.0);
        assert_eq!(peak_of(&out), 0.0);
    }

    #[test]
    fn solo_on_another_track_silences_the_pattern() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine); // kick pattern
        machine.toggle_solo(1); // solo the (empty) snare
        machine.toggle_play();

        let out = render_seconds(&mut machine, 1.0);
        assert_eq!(peak_of(&out), 0.0);
    }

    #[test]
    fn soloed_track_still_sounds() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine);
        machine.toggle_solo(0);
        machine.toggle_play();

        let out = render_seconds(&mut machine, 1.0);
        assert!(peak_of(&out) > 0.05);
    }

    #[test]
    fn current_step_stays_in_range_and_cycles() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        machine.toggle_play();

        let mut seen = vec![false; DEFAULT_STEPS];
        let mut block = vec![0.0f32; BLOCK];
        // 2.5 seconds at 120 BPM covers more than a full bar
        for _ in 0..(2.5 * SAMPLE_RATE) as usize / BLOCK {
            machine.render_block(&mut block);
            let step = machine.current_step();
            assert!(step < DEFAULT_STEPS);
            seen[step] = true;
        }
        assert!(seen.iter().all(|&s| s), "all 16 steps should be visited");
    }

    #[test]
    fn stopping_rewinds_the_playhead() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        machine.toggle_play();
        let _ = render_seconds(&mut machine, 1.0);
        assert_ne!(machine.current_step(), 0);

        machine.toggle_play(); // stop
        assert!(!machine.is_playing());
        assert_eq!(machine.current_step(), 0);
    }

    #[test]
    fn bpm_changes_are_clamped() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        machine.set_bpm(1.0);
        assert_eq!(machine.bpm(), 40.0);
        machine.set_bpm(9_999.0);
        assert_eq!(machine.bpm(), 300.0);
    }

    #[test]
    fn simultaneous_triggers_share_a_step() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        // Kick and clap on the same downbeat
        machine.begin_paint(0, 0);
        machine.begin_paint(3, 0);
        machine.toggle_play();

        let out = render_seconds(&mut machine, 0.25);
        assert!(peak_of(&out) > 0.05);
    }

    #[test]
    fn snapshot_reflects_edits() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        machine.begin_paint(2, 5);
        machine.toggle_mute(1);
        machine.set_bpm(140.0);

        let snap = machine.snapshot();
        assert_eq!(snap.bpm, 140.0);
        assert_eq!(snap.tracks.len(), 4);
        assert!(snap.tracks[2].cells[5]);
        assert!(snap.tracks[1].muted);
        assert!(!snap.tracks[1].audible);
        assert_eq!(snap.tracks[0].name, "KICK");
    }

    #[test]
    fn clear_grid_stops_future_hits() {
        let mut machine = DrumMachine::with_default_kit(SAMPLE_RATE);
        four_on_floor(&mut machine);
        machine.clear_grid();
        machine.toggle_play();

        let out = render_seconds(&mut machine, 0.5);
        assert_eq!(peak_of(&out), 0.0);
    }
}
