use crate::graph::node::{GraphNode, RenderCtx};

/// Serial chain: render the source into the buffer, then let the effect
/// process it in place. `noise → bandpass` is a Through; contrast with
/// Amplify (multiplication) and Mix (parallel blend).
pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.source.trigger(ctx);
        self.effect.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
