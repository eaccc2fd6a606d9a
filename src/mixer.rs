#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::gain::db_to_linear;

/*
Mixer
=====

Per-track volume, mute, and solo, plus a master fader. The only rule with
any subtlety is solo resolution:

    audible(track) = !muted(track) AND (no solo anywhere OR soloed(track))

Soloing is a property of the whole mixer, not of one strip: the moment any
track is soloed, every non-soloed track goes silent regardless of its mute
flag, and un-soloing the last track restores them. Mute always wins - a
track that is both muted and soloed stays silent.

Gains are pure functions of the {volumes, mutes, solos} tuple and are
recomputed on every query; there is no cached state to fall out of sync.
*/

/// Fader range. The floor is treated as silence by the UI.
pub const MIN_VOLUME_DB: f32 = -60.0;
pub const MAX_VOLUME_DB: f32 = 6.0;

/// Master fader range: cut only, no boost.
pub const MAX_MASTER_DB: f32 = 0.0;

/// One channel strip.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStrip {
    pub name: String,
    pub volume_db: f32,
    pub muted: bool,
    pub soloed: bool,
}

impl TrackStrip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume_db: 0.0,
            muted: false,
            soloed: false,
        }
    }

    pub fn with_volume_db(mut self, volume_db: f32) -> Self {
        self.volume_db = volume_db.clamp(MIN_VOLUME_DB, MAX_VOLUME_DB);
        self
    }
}

pub struct Mixer {
    strips: Vec<TrackStrip>,
    master_db: f32,
}

impl Mixer {
    pub fn new(strips: Vec<TrackStrip>) -> Self {
        Self {
            strips,
            master_db: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn strip(&self, track: usize) -> &TrackStrip {
        &self.strips[track]
    }

    pub fn strips(&self) -> &[TrackStrip] {
        &self.strips
    }

    /// Set a track fader, clamped to the fader range.
    pub fn set_volume_db(&mut self, track: usize, volume_db: f32) {
        if !volume_db.is_finite() {
            return;
        }
        self.strips[track].volume_db = volume_db.clamp(MIN_VOLUME_DB, MAX_VOLUME_DB);
    }

    pub fn adjust_volume_db(&mut self, track: usize, delta_db: f32) {
        let current = self.strips[track].volume_db;
        self.set_volume_db(track, current + delta_db);
    }

    pub fn toggle_mute(&mut self, track: usize) {
        self.strips[track].muted = !self.strips[track].muted;
    }

    pub fn toggle_solo(&mut self, track: usize) {
        self.strips[track].soloed = !self.strips[track].soloed;
    }

    pub fn master_db(&self) -> f32 {
        self.master_db
    }

    pub fn set_master_db(&mut self, master_db: f32) {
        if !master_db.is_finite() {
            return;
        }
        self.master_db = master_db.clamp(MIN_VOLUME_DB, MAX_MASTER_DB);
    }

    pub fn adjust_master_db(&mut self, delta_db: f32) {
        self.set_master_db(self.master_db + delta_db);
    }

    fn any_solo(&self) -> bool {
        self.strips.iter().any(|s| s.soloed)
    }

    /// Mute/solo resolution: audible iff not muted and (no solo active or
    /// this track is soloed).
    pub fn is_audible(&self, track: usize) -> bool {
        let strip = &self.strips[track];
        !strip.muted && (!self.any_solo() || strip.soloed)
    }

    /// Linear gain for a track: 0.0 when inaudible, otherwise the fader.
    pub fn track_gain(&self, track: usize) -> f32 {
        if self.is_audible(track) {
            db_to_linear(self.strips[track].volume_db)
        } else {
            0.0
        }
    }

    pub fn master_gain(&self) -> f32 {
        db_to_linear(self.master_db)
    }
}
