use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Drum Oscillators
================

An oscillator generates the raw material a drum voice is shaped from. A drum
machine needs far fewer waveforms than a melodic synth - percussion timbres
come almost entirely from three sources:

Sine: A single frequency, no harmonics.
  - Sound: Pure, deep, round
  - Use: Kick drum body (with a pitch sweep for the "punch")

Triangle: Odd harmonics falling off as 1/n² - barely brighter than a sine.
  - Sound: Soft, woody
  - Use: Snare drum body (the drum-head tone under the rattle)

Noise: Every frequency at once, no pitch.
  - Sound: Hiss, static
  - Use: Snare rattle, hi-hats, claps - anything "metallic" or "airy"

Phase Accumulation
------------------
The pitched waveforms track a phase in [0, 1) that advances by
frequency / sample_rate each sample and wraps. Keeping phase inside the
oscillator (rather than deriving it from a global clock) means a retrigger
can reset it, giving every hit an identical attack transient.

Noise Generation
----------------
White noise is a stream of uniform random samples. We use a 32-bit xorshift
generator: three shifts and xors per sample, no dependency, and statistically
plenty for audio. Seeding is fixed, so offline renders are reproducible -
which the regression tests rely on.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Noise,
}

pub struct OscillatorBlock {
    waveform: Waveform,
    /// Phase in [0, 1). Meaningless for noise.
    phase: f32,
    /// Xorshift state for the noise generator. Never zero.
    noise_state: u32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            noise_state: 0x2F6E_2B1D,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(Waveform::Noise)
    }

    /// Restart the waveform at phase zero for a clean attack transient.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn next_noise(&mut self) -> f32 {
        // xorshift32 (Marsaglia)
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;
        // Map to [-1.0, 1.0)
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    /// Fill `buffer` with one block of output at `ctx.frequency`.
    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        match self.waveform {
            Waveform::Noise => {
                for sample in buffer.iter_mut() {
                    *sample = self.next_noise();
                }
            }
            Waveform::Sine => {
                let increment = ctx.frequency / ctx.sample_rate;
                for sample in buffer.iter_mut() {
                    *sample = (TAU * self.phase).sin();
                    self.phase += increment;
                    if self.phase >= 1.0 {
                        self.phase -= 1.0;
                    }
                }
            }
            Waveform::Triangle => {
                let increment = ctx.frequency / ctx.sample_rate;
                for sample in buffer.iter_mut() {
                    // Peaks at phase 0.5, troughs at 0.0 / 1.0
                    *sample = 1.0 - 4.0 * (self.phase - 0.5).abs();
                    self.phase += increment;
                    if self.phase >= 1.0 {
                        self.phase -= 1.0;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn ctx(frequency: f32) -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, frequency, 1.0)
    }

    #[test]
    fn sine_matches_closed_form() {
        let mut osc = OscillatorBlock::sine();
        let ctx = ctx(440.0);
        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, &ctx);

        // sample n should be sin(2pi f n / sr)
        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / SAMPLE_RATE).sin();
        assert!(
            (buffer[n] - expected).abs() < 1e-5,
            "expected {expected}, got {}",
            buffer[n]
        );
    }

    #[test]
    fn triangle_stays_in_range() {
        let mut osc = OscillatorBlock::triangle();
        let mut buffer = vec![0.0f32; 512];
        osc.render(&mut buffer, &ctx(220.0));

        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
        let peak = buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.9, "triangle should reach near full scale, got {peak}");
    }

    #[test]
    fn noise_is_reproducible_and_nonsilent() {
        let mut a = OscillatorBlock::noise();
        let mut b = OscillatorBlock::noise();
        let mut buf_a = vec![0.0f32; 256];
        let mut buf_b = vec![0.0f32; 256];
        a.render(&mut buf_a, &ctx(0.0));
        b.render(&mut buf_b, &ctx(0.0));

        assert_eq!(buf_a, buf_b, "fixed seed should give identical streams");
        assert!(buf_a.iter().any(|s| s.abs() > 0.1));
        assert!(buf_a.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn reset_restarts_phase() {
        let mut osc = OscillatorBlock::sine();
        let ctx = ctx(440.0);
        let mut first = vec![0.0f32; 64];
        osc.render(&mut first, &ctx);

        osc.reset();
        let mut second = vec![0.0f32; 64];
        osc.render(&mut second, &ctx);

        assert_eq!(first, second);
    }
}
