pub mod dsp;
pub mod graph; // Composable one-shot voice graphs
pub mod machine;
pub mod mixer;
pub mod sequencing; // Step grid and transport timing
pub mod voices;

pub use machine::DrumMachine;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
