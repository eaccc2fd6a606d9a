pub mod grid;
pub mod transport;

pub use grid::{PaintGesture, StepGrid};
pub use transport::{StepEvent, Transport, MAX_BPM, MIN_BPM};
