use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a modulator, sample by sample. With an envelope as
/// the modulator this is amplitude shaping - the operation that turns a
/// continuous noise source into a discrete drum hit.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Render signal into output
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.signal.trigger(ctx);
        self.modulator.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        // The modulator gates the output: once the envelope is idle the
        // product is silence no matter what the source does.
        self.modulator.is_active() && self.signal.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn envelope_gates_the_source() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut node = OscNode::noise().amplify(EnvNode::perc(0.001, 0.01));

        // Untriggered: envelope idle, output silent
        let mut buffer = vec![0.0f32; 128];
        node.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(!node.is_active());

        // Triggered: output appears
        node.trigger(&ctx);
        node.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().any(|&s| s.abs() > 0.01));
        assert!(node.is_active());
    }
}
