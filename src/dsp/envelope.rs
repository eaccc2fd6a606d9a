use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Percussion Envelope (Attack-Decay)
==================================

Drum hits are one-shot events: nothing holds a note down, so the classic
ADSR generator collapses to its two transient stages. The envelope here is
a three-state machine:

    ┌──────┐  trigger   ┌────────┐  level=peak  ┌───────┐
    │ Idle │ ─────────→ │ Attack │ ───────────→ │ Decay │
    └──────┘            └────────┘              └───────┘
        ↑                                           │
        └────────────────── level=0 ────────────────┘

  trigger     Starts the attack from zero, even mid-decay. Resetting to
              zero on retrigger keeps repeated sixteenth-note hits from
              smearing into each other.

  peak        The level the attack ramps to. We store the trigger velocity
              here, so a quieter hit is quieter for its whole duration -
              this is what makes the clap's three-impact flam fade.

  increment   Per-sample level change, derived the usual way:
              increment = target_change / (time_seconds * sample_rate).

Ramps are linear, like the rest of this crate. Linear decay reads as
"punchy" for percussion; the difference from an exponential tail is
inaudible under a 150 ms drum hit.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
}

pub struct Envelope {
    attack_time: f32, // seconds to ramp 0 → peak
    decay_time: f32,  // seconds to ramp peak → 0

    stage: EnvelopeStage,
    level: f32,
    peak: f32,
}

impl Envelope {
    /// Attack-decay envelope. Times are clamped to at least one sample
    /// at 48 kHz so the increments stay finite.
    pub fn perc(attack: f32, decay: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            stage: EnvelopeStage::Idle,
            level: 0.0,
            peak: 1.0,
        }
    }

    /// Fire the envelope. `velocity` (0.0 - 1.0) becomes the attack peak.
    pub fn trigger(&mut self, velocity: f32) {
        self.level = 0.0;
        self.peak = velocity.clamp(0.0, 1.0);
        self.stage = EnvelopeStage::Attack;
    }

    /// Advance one sample.
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                let increment = self.peak / (self.attack_time * ctx.sample_rate);
                self.level += increment;
                if self.level >= self.peak {
                    self.level = self.peak;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                let decrement = self.peak / (self.decay_time * ctx.sample_rate);
                self.level -= decrement;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
