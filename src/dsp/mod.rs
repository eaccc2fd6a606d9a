pub mod envelope;
pub mod filter;
pub mod gain;
pub mod oscillator;
