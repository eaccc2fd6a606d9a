/*
Transport Clock
===============

The transport advances a cyclic step index at a rate derived from the
tempo. Sixteen steps to a 4/4 bar makes each step a sixteenth note:

    samples_per_step = sample_rate * 60 / (bpm * 4)

The clock runs inside the audio render call, not on a timer thread: each
block, `process` reports which steps fire and at which sample-frame offset
inside the block. That offset is the scheduling timestamp - triggers land
sample-accurately even when a step boundary falls mid-block, and tempo
jitter can't accumulate the way a callback-timer loop drifts.

Out-of-range tempo is clamped, never rejected. Stopping halts step events
and rewinds the step index to 0, so the next play starts the pattern from
the top (and fires step 0 immediately, at offset 0).
*/

pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 300.0;

/// Steps per quarter note: sixteen steps to a 4/4 bar.
const STEPS_PER_BEAT: f32 = 4.0;

/// A step boundary inside the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// Which column of the grid fires.
    pub step: usize,
    /// Sample-frame offset inside the block - the scheduling timestamp.
    pub offset: usize,
}

pub struct Transport {
    sample_rate: f32,
    steps: usize,
    bpm: f32,
    playing: bool,

    /// Next step to fire.
    next_step: usize,
    /// Last fired step, for UI highlight.
    current_step: usize,
    /// Frames until the next step boundary (fractional, to avoid drift).
    countdown: f64,
    samples_per_step: f64,
}

impl Transport {
    pub fn new(sample_rate: f32, steps: usize) -> Self {
        let bpm = 120.0;
        Self {
            sample_rate,
            steps,
            bpm,
            playing: false,
            next_step: 0,
            current_step: 0,
            countdown: 0.0,
            samples_per_step: Self::compute_samples_per_step(bpm, sample_rate),
        }
    }

    fn compute_samples_per_step(bpm: f32, sample_rate: f32) -> f64 {
        let steps_per_second = (bpm as f64 / 60.0) * STEPS_PER_BEAT as f64;
        sample_rate as f64 / steps_per_second
    }

    /// Set tempo. Values outside [40, 300] BPM are clamped; non-finite
    /// input is ignored.
    pub fn set_bpm(&mut self, bpm: f32) {
        if !bpm.is_finite() {
            return;
        }
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        self.samples_per_step = Self::compute_samples_per_step(self.bpm, self.sample_rate);
        // A tempo jump mid-step applies no later than the new interval
        self.countdown = self.countdown.min(self.samples_per_step);
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last fired step, always in [0, steps).
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Start playback. The first step fires immediately on the next block.
    pub fn play(&mut self) {
        self.playing = true;
        self.countdown = 0.0;
    }

    /// Stop playback and rewind to step 0.
    pub fn stop(&mut self) {
        self.playing = false;
        self.next_step = 0;
        self.current_step = 0;
        self.countdown = 0.0;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Advance the clock by one block of `frames`, pushing every step
    /// boundary inside the block into `events` (cleared first).
    pub fn process(&mut self, frames: usize, events: &mut Vec<StepEvent>) {
        events.clear();
        if !self.playing || frames == 0 {
            return;
        }

        let mut cursor = 0.0f64;
        while cursor + self.countdown < frames as f64 {
            cursor += self.countdown;
            events.push(StepEvent {
                step: self.next_step,
                offset: cursor as usize,
            });
            self.current_step = self.next_step;
            self.next_step = (self.next_step + 1) % self.steps;
            self.countdown = self.samples_per_step;
        }
        self.countdown -= frames as f64 - cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn collect_steps(transport: &mut Transport, blocks: usize, block_size: usize) -> Vec<StepEvent> {
        let mut all = Vec::new();
        let mut events = Vec::new();
        for _ in 0..blocks {
            transport.process(block_size, &mut events);
            all.extend(events.iter().copied());
        }
        all
    }

    #[test]
    fn bpm_is_clamped_not_rejected() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.set_bpm(10.0);
        assert_eq!(transport.bpm(), MIN_BPM);
        transport.set_bpm(1_000.0);
        assert_eq!(transport.bpm(), MAX_BPM);
        transport.set_bpm(128.0);
        assert_eq!(transport.bpm(), 128.0);
        transport.set_bpm(f32::NAN);
        assert_eq!(transport.bpm(), 128.0);
    }

    #[test]
    fn stopped_transport_emits_nothing() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        let mut events = Vec::new();
        transport.process(4_096, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn first_step_fires_at_offset_zero() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();
        let mut events = Vec::new();
        transport.process(256, &mut events);
        assert_eq!(events, vec![StepEvent { step: 0, offset: 0 }]);
    }

    #[test]
    fn step_spacing_matches_tempo() {
        // 120 BPM at 48 kHz: a sixteenth is exactly 6000 samples
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();

        let events = collect_steps(&mut transport, 1, 48_000);
        let offsets: Vec<usize> = events.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0, 6_000, 12_000, 18_000, 24_000, 30_000, 36_000, 42_000]);
    }

    #[test]
    fn step_index_wraps_modulo_grid_width() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();

        // Two bars worth of sixteenths at 120 BPM
        let events = collect_steps(&mut transport, 4, 48_000);
        assert_eq!(events.len(), 32);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.step, i % 16);
            assert!(event.step < 16);
        }
    }

    #[test]
    fn boundaries_split_across_odd_blocks() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();

        // Render one second in awkward block sizes; total step count must
        // match the whole-block case and offsets must stay in range.
        let mut fired = 0;
        let mut events = Vec::new();
        let mut remaining = 48_000usize;
        while remaining > 0 {
            let block = remaining.min(613);
            transport.process(block, &mut events);
            for e in &events {
                assert!(e.offset < block);
            }
            fired += events.len();
            remaining -= block;
        }
        assert_eq!(fired, 8);
    }

    #[test]
    fn stop_rewinds_to_step_zero() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();
        let _ = collect_steps(&mut transport, 1, 20_000);
        assert_ne!(transport.current_step(), 0);

        transport.stop();
        assert_eq!(transport.current_step(), 0);

        transport.play();
        let mut events = Vec::new();
        transport.process(64, &mut events);
        assert_eq!(events[0].step, 0, "restart begins at the top of the pattern");
    }

    #[test]
    fn raising_tempo_shortens_the_current_step() {
        let mut transport = Transport::new(SAMPLE_RATE, 16);
        transport.play();
        let mut events = Vec::new();
        transport.process(100, &mut events); // fires step 0, countdown ~5900

        transport.set_bpm(300.0); // sixteenth = 2400 samples
        transport.process(2_401, &mut events);
        assert_eq!(events.len(), 1, "new interval should apply without waiting out the old one");
    }
}
