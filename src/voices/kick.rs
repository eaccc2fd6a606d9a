//! Kick drum voice.
//!
//! A classic synthesized kick: a sine wave whose pitch starts high and
//! drops fast to the fundamental, giving the "punch", shaped by a quick
//! amplitude envelope and smoothed with a lowpass.
//!
//! # How It Works
//!
//! 1. Sine oscillator pinned at 50 Hz (kicks ignore sequencer pitch)
//! 2. Pitch sweep from 150 Hz settling in ~20 ms
//! 3. Instant attack, 400 ms decay
//! 4. Lowpass at 200 Hz removes any harshness
//!
//! # Variations
//!
//! - Longer decay = boomy 808-style kick
//! - Higher sweep start = more "click" attack

use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode};

/// Create a kick drum voice.
pub fn kick() -> impl crate::graph::GraphNode {
    OscNode::sine()
        .with_frequency(50.0)
        .with_pitch_sweep(150.0, 0.02)
        // Punch with a quick decay
        .amplify(EnvNode::perc(0.001, 0.4))
        // Low-pass to keep it smooth
        .through(FilterNode::lowpass(200.0))
}
