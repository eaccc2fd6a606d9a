/// Context passed to graph nodes during rendering.
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz); percussion sources usually override it
/// - velocity: Hit intensity (0.0 - 1.0)
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
}

impl RenderCtx {
    /// Create a context from a direct frequency (the drum-machine use case).
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
        }
    }

    /// Same context at a different velocity. Used by the clap's flam to
    /// fire its follow-up impacts quieter than the first.
    pub fn with_velocity(&self, velocity: f32) -> Self {
        Self {
            sample_rate: self.sample_rate,
            frequency: self.frequency,
            velocity,
        }
    }
}

/// Core trait for audio processing graph nodes.
///
/// Nodes render audio and respond to trigger events. Drums are one-shot:
/// there is a `trigger` but no release - sound ends when envelopes decay.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Fire the node. Retriggering a sounding node restarts it cleanly.
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn trigger(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Check if this node is still producing sound.
    ///
    /// Used by the machine to skip rendering tracks that have decayed out.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch).
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        (**self).trigger(ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
