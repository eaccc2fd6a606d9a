//! Clap voice.
//!
//! A hand clap is not one impact - it's several palms landing a few
//! milliseconds apart. The voice fires a bandpassed noise burst three
//! times: at the trigger, +10 ms, and +20 ms, each quieter than the last
//! (a "flam"). The ~1.5 kHz bandpass is what leaves the characteristic
//! "crack" frequencies.
//!
//! # Variations
//!
//! - Higher bandpass center = thinner, more "crack"
//! - Longer decay = more reverberant room feel

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::FilterNode,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};

/// Create a clap voice.
pub fn clap() -> impl GraphNode {
    let burst = OscNode::noise()
        // Bandpass focuses on the "crack" frequencies
        .through(FilterNode::bandpass(1_500.0))
        .amplify(EnvNode::perc(0.005, 0.3))
        // Boost to cut through the mix
        .gain(1.5);

    Flam::new(burst, [0.010, 0.020], [0.7, 0.5])
}

/// Retriggers the wrapped node at fixed delays after each trigger, with
/// scaled-down velocities. Monophonic like the rest of the kit: a follow-up
/// impact steals the voice from the previous one.
struct Flam<N> {
    inner: N,
    delays: [f32; 2],     // seconds after the initial impact
    velocities: [f32; 2], // relative to the trigger velocity
    pending: [Option<PendingImpact>; 2],
}

#[derive(Clone, Copy)]
struct PendingImpact {
    samples_left: usize,
    velocity: f32,
}

impl<N> Flam<N> {
    fn new(inner: N, delays: [f32; 2], velocities: [f32; 2]) -> Self {
        Self {
            inner,
            delays,
            velocities,
            pending: [None, None],
        }
    }
}

impl<N: GraphNode> GraphNode for Flam<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let mut cursor = 0;
        while cursor < out.len() {
            let span = out.len() - cursor;
            let due = self
                .pending
                .iter()
                .flatten()
                .map(|p| p.samples_left)
                .min()
                .unwrap_or(span)
                .min(span);

            if due > 0 {
                self.inner
                    .render_block(&mut out[cursor..cursor + due], ctx);
                for slot in self.pending.iter_mut().flatten() {
                    slot.samples_left -= due;
                }
                cursor += due;
            }

            for slot in self.pending.iter_mut() {
                if let Some(impact) = slot {
                    if impact.samples_left == 0 {
                        self.inner.trigger(&ctx.with_velocity(impact.velocity));
                        *slot = None;
                    }
                }
            }
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.inner.trigger(ctx);
        for i in 0..2 {
            self.pending[i] = Some(PendingImpact {
                samples_left: (self.delays[i] * ctx.sample_rate) as usize,
                velocity: self.velocities[i] * ctx.velocity,
            });
        }
    }

    fn is_active(&self) -> bool {
        self.inner.is_active() || self.pending.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    /// Records when and how hard it was triggered; renders its sample
    /// counter so offsets are observable.
    struct Probe {
        rendered: usize,
        hits: Vec<(usize, f32)>,
    }

    impl GraphNode for Probe {
        fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
            self.rendered += out.len();
        }

        fn trigger(&mut self, ctx: &RenderCtx) {
            self.hits.push((self.rendered, ctx.velocity));
        }
    }

    #[test]
    fn flam_fires_three_impacts_with_falling_velocity() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0);
        let probe = Probe {
            rendered: 0,
            hits: Vec::new(),
        };
        let mut flam = Flam::new(probe, [0.010, 0.020], [0.7, 0.5]);

        flam.trigger(&ctx);
        let mut buffer = vec![0.0f32; (0.03 * SAMPLE_RATE) as usize];
        flam.render_block(&mut buffer, &ctx);

        let ten_ms = (0.010 * SAMPLE_RATE) as usize;
        assert_eq!(
            flam.inner.hits,
            vec![(0, 1.0), (ten_ms, 0.7), (2 * ten_ms, 0.5)]
        );
    }

    #[test]
    fn flam_impacts_straddle_block_boundaries() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0);
        let probe = Probe {
            rendered: 0,
            hits: Vec::new(),
        };
        let mut flam = Flam::new(probe, [0.010, 0.020], [0.7, 0.5]);

        flam.trigger(&ctx);
        // Render in odd-sized blocks; impact offsets must still land exactly
        let mut buffer = vec![0.0f32; 97];
        let total = (0.03 * SAMPLE_RATE) as usize;
        let mut rendered = 0;
        while rendered < total {
            flam.render_block(&mut buffer, &ctx);
            rendered += buffer.len();
        }

        let ten_ms = (0.010 * SAMPLE_RATE) as usize;
        assert_eq!(
            flam.inner.hits,
            vec![(0, 1.0), (ten_ms, 0.7), (2 * ten_ms, 0.5)]
        );
    }

    #[test]
    fn pending_impacts_keep_voice_active() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0);
        let mut voice = clap();
        voice.trigger(&ctx);
        assert!(voice.is_active());
    }
}
