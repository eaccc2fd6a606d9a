use crate::dsp::filter::SVFilter;
use crate::graph::node::{GraphNode, RenderCtx};

/// Filter node wrapping the state-variable filter for use in voice chains.
///
/// Triggering resets the integrator state so each hit starts from silence
/// instead of the previous hit's tail.
pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::highpass(cutoff_hz),
        }
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::bandpass(cutoff_hz),
        }
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.filter.set_resonance(resonance);
        self
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}
