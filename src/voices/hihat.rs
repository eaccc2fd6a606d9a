//! Closed hi-hat voice.
//!
//! A tight burst of bright noise: high-pass filtered so only the "tss"
//! frequencies remain, with a very short envelope.
//!
//! # Variations
//!
//! - Longer decay = open hat
//! - Lower cutoff = darker, jazzier hat

use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode};

/// Create a closed hi-hat voice.
pub fn hihat() -> impl crate::graph::GraphNode {
    OscNode::noise()
        .amplify(EnvNode::perc(0.001, 0.05))
        .through(FilterNode::highpass(7_000.0))
}
