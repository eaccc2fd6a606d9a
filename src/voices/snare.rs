//! Snare drum voice.
//!
//! Tonal body plus noise rattle. Real snares have wires under the bottom
//! head that buzz when the drum is struck; filtered white noise stands in
//! for the buzz, a soft triangle for the head.
//!
//! # How It Works
//!
//! 1. White noise through a ~3 kHz bandpass = wire rattle
//! 2. Triangle at 180 Hz, lowpassed = drum-head body
//! 3. Blend leans toward the rattle (that's what reads as "snare")

use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode};

/// Create a snare drum voice.
pub fn snare() -> impl crate::graph::GraphNode {
    // Noise for the rattle, band-pass filtered
    let rattle = OscNode::noise()
        .amplify(EnvNode::perc(0.001, 0.2))
        .through(FilterNode::bandpass(3_000.0));

    // Triangle for the tonal body
    let body = OscNode::triangle()
        .with_frequency(180.0)
        .amplify(EnvNode::perc(0.001, 0.08))
        .through(FilterNode::lowpass(400.0));

    // More rattle than body
    body.mix(rattle, 0.7)
}
