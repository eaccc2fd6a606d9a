use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/// Frequency is updated in chunks of this many samples while a pitch sweep
/// is running. Small enough that a 50 ms kick sweep stays smooth.
const SWEEP_CHUNK: usize = 16;

/// Oscillator source node.
///
/// Wraps the raw oscillator with the two behaviors drum voices need:
///
/// - A fixed base frequency (`with_frequency`) so the sound ignores
///   whatever pitch the context carries - a kick is tuned by its voice,
///   not the sequencer.
/// - An exponential pitch sweep (`with_pitch_sweep`): on trigger the
///   frequency starts high and falls toward the base. This is the classic
///   electronic-kick "punch" (~150 Hz dropping to ~50 Hz in a few
///   dozen milliseconds).
pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency.
    base_frequency: Option<f32>,
    /// Sweep start frequency and time constant, if any.
    sweep: Option<Sweep>,
    /// Remaining sweep amount in [0, 1]; 0 when settled at base.
    sweep_env: f32,
}

struct Sweep {
    start_hz: f32,
    /// Time constant in seconds; the sweep is ~95% settled after 3x this.
    tau: f32,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            sweep: None,
            sweep_env: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Set a fixed frequency, ignoring the pitch from RenderCtx.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self
    }

    /// Sweep from `start_hz` down to the base frequency on every trigger.
    ///
    /// # Example
    /// ```ignore
    /// // Kick drum: 150 Hz punch settling at 50 Hz
    /// OscNode::sine().with_frequency(50.0).with_pitch_sweep(150.0, 0.02)
    /// ```
    pub fn with_pitch_sweep(mut self, start_hz: f32, tau_seconds: f32) -> Self {
        self.sweep = Some(Sweep {
            start_hz,
            tau: tau_seconds.max(crate::MIN_TIME),
        });
        self
    }

    #[inline]
    fn base_freq(&self, ctx: &RenderCtx) -> f32 {
        self.base_frequency.unwrap_or(ctx.frequency)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let base = self.base_freq(ctx);

        match &self.sweep {
            None => {
                let sub_ctx = RenderCtx::from_freq(ctx.sample_rate, base, ctx.velocity);
                self.osc.render(out, &sub_ctx);
            }
            Some(sweep) if self.sweep_env <= 1e-4 => {
                let sub_ctx = RenderCtx::from_freq(ctx.sample_rate, base, ctx.velocity);
                let _ = sweep;
                self.osc.render(out, &sub_ctx);
            }
            Some(sweep) => {
                // Exponential settle toward base, updated per chunk
                let per_sample = (-1.0 / (sweep.tau * ctx.sample_rate)).exp();
                let span = sweep.start_hz - base;

                for chunk in out.chunks_mut(SWEEP_CHUNK) {
                    let freq = base + span * self.sweep_env;
                    let sub_ctx = RenderCtx::from_freq(ctx.sample_rate, freq, ctx.velocity);
                    self.osc.render(chunk, &sub_ctx);
                    self.sweep_env *= per_sample.powi(chunk.len() as i32);
                }
            }
        }
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
        if self.sweep.is_some() {
            self.sweep_env = 1.0;
        }
    }
}
