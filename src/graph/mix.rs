use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Parallel blend of two graphs using a linear crossfade.
///
/// output = a × (1 - balance) + b × balance
///
/// The snare is the kit's user: drum-head body blended with filtered noise
/// rattle. Weights sum to 1.0, so blending two full-scale sources cannot
/// clip on its own.
pub struct Mix<A, B> {
    a: A,
    b: B,
    balance: f32,
    temp_buffer: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(a: A, b: B, balance: f32) -> Self {
        Self {
            a,
            b,
            balance: balance.clamp(0.0, 1.0),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Mix<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.a.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.b.render_block(frames, ctx);

        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;
        for (o, &s) in out.iter_mut().zip(frames.iter()) {
            *o = *o * weight_a + s * weight_b;
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.a.trigger(ctx);
        self.b.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.a.is_active() || self.b.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn active_while_either_side_sounds() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        // Short envelope on one side, long on the other
        let mut node = OscNode::sine()
            .amplify(EnvNode::perc(0.001, 0.01))
            .mix(OscNode::noise().amplify(EnvNode::perc(0.001, 0.5)), 0.5);
        node.trigger(&ctx);

        // Render past the short side's decay
        let mut buffer = vec![0.0f32; 4_096];
        node.render_block(&mut buffer, &ctx);

        assert!(node.is_active(), "long side should keep the mix active");
    }
}
