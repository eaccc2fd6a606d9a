use crate::dsp::envelope::Envelope;
use crate::graph::node::{GraphNode, RenderCtx};

/// Envelope node: renders the attack-decay control signal so it can be
/// multiplied onto a source with `.amplify()`.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    /// Percussion envelope with the given attack and decay in seconds.
    pub fn perc(attack: f32, decay: f32) -> Self {
        Self {
            env: Envelope::perc(attack, decay),
        }
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.env.trigger(ctx.velocity);
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
