//! Composable building blocks for one-shot drum voices.
//!
//! A voice is a small graph of nodes: an oscillator or noise source shaped
//! by envelopes and filters. Nodes render block-by-block and respond to a
//! single `trigger` event (drums have no note-off). The `extensions` module
//! adds fluent combinators so a kit piece reads as a chain:
//! `OscNode::noise().through(FilterNode::highpass(7_000.0)).amplify(...)`.

/// Multiply a signal by a modulator (envelope shaping).
pub mod amplify;
/// Percussion envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.mix()`, `.gain()`).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Constant gain stage.
pub mod gain;
/// Linear blend of two parallel graphs.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Oscillator and noise source node, with optional pitch sweep.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
