use crate::dsp::gain::apply_gain;
use crate::graph::node::{GraphNode, RenderCtx};

/// Constant gain stage. Voices use it to balance themselves against the
/// rest of the kit (the clap boosts itself to cut through the mix).
pub struct Gain<N> {
    inner: N,
    gain: f32,
}

impl<N> Gain<N> {
    pub fn new(inner: N, gain: f32) -> Self {
        Self { inner, gain }
    }
}

impl<N: GraphNode> GraphNode for Gain<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.inner.render_block(out, ctx);
        apply_gain(out, self.gain);
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.inner.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}
