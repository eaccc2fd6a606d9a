//! The four-piece kit.
//!
//! Each voice is a ready-to-use node graph matching one row of the step
//! grid. All are one-shot, unpitched percussion: trigger them and they
//! decay on their own.
//!
//! # Example
//!
//! ```ignore
//! use gridbeat::voices;
//!
//! let kick = voices::kick();
//! let snare = voices::snare();
//! let hihat = voices::hihat();
//! let clap = voices::clap();
//! ```

mod clap;
mod hihat;
mod kick;
mod snare;

pub use clap::clap;
pub use hihat::hihat;
pub use kick::kick;
pub use snare::snare;

#[cfg(test)]
mod tests {
    use crate::graph::{GraphNode, RenderCtx};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn check_one_shot(name: &str, mut voice: Box<dyn GraphNode>) {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0);

        // Silent before the first trigger
        let mut buffer = vec![0.0f32; 1_024];
        voice.render_block(&mut buffer, &ctx);
        assert!(
            buffer.iter().all(|&s| s == 0.0),
            "{name} should be silent before trigger"
        );

        // Audible after a trigger
        voice.trigger(&ctx);
        voice.render_block(&mut buffer, &ctx);
        let peak = buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.01, "{name} should sound after trigger, peak {peak}");
        assert!(
            buffer.iter().all(|s| s.is_finite()),
            "{name} produced non-finite samples"
        );

        // Decays out within two seconds
        let mut tail = vec![0.0f32; 1_024];
        for _ in 0..(2.0 * SAMPLE_RATE) as usize / tail.len() {
            tail.fill(0.0);
            voice.render_block(&mut tail, &ctx);
        }
        let tail_peak = tail.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(
            tail_peak < 1e-3,
            "{name} should decay to silence, tail peak {tail_peak}"
        );
        assert!(!voice.is_active(), "{name} should report inactive after decay");
    }

    #[test]
    fn kick_is_a_one_shot() {
        check_one_shot("kick", Box::new(super::kick()));
    }

    #[test]
    fn snare_is_a_one_shot() {
        check_one_shot("snare", Box::new(super::snare()));
    }

    #[test]
    fn hihat_is_a_one_shot() {
        check_one_shot("hihat", Box::new(super::hihat()));
    }

    #[test]
    fn clap_is_a_one_shot() {
        check_one_shot("clap", Box::new(super::clap()));
    }
}
