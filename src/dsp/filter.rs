use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/*
State-Variable Filter
=====================

Every voice in the kit is "noise or a simple wave, shaped by a filter":

| type      | passes          | kit use                              |
| --------- | --------------- | ------------------------------------ |
| low-pass  | below cutoff    | kick body, snare drum-head tone      |
| band-pass | around cutoff   | snare rattle (~3 kHz), clap (~1.5 k) |
| high-pass | above cutoff    | hi-hat (~7 kHz)                      |

The topology is the TPT state-variable filter: two integrators whose states
(`ic1eq`, `ic2eq`) are updated with the trapezoidal rule, giving all three
responses from one pass and staying stable when the cutoff moves. The `g`
coefficient pre-warps the cutoff frequency so the digital filter lands on
the analog target; `k` is damping, derived from resonance.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz.clamp(20.0, 20_000.0);
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 0.95);
    }

    /// Clear the integrator state. Call on retrigger so the previous hit's
    /// tail doesn't thump into the new one.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        // Pre-warped cutoff coefficient
        let wd = TAU * self.cutoff_hz;
        (wd / (2.0 * ctx.sample_rate)).tan()
    }

    #[inline]
    fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        match self.filter_type {
            FilterType::LowPass => v2,
            FilterType::BandPass => v1,
            FilterType::HighPass => sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        let k = 2.0 - (2.0 * self.resonance);

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }
}
