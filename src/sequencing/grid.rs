#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Step Grid
=========

The pattern is a fixed-size boolean matrix: one row per track, one column
per step. Editing uses "paint" semantics borrowed from every drum machine
UI since the TR-808 went software:

  - Pressing a cell starts a gesture whose target value is the negation of
    that cell (pressing an empty cell paints steps ON, pressing a filled
    cell erases).
  - Every cell dragged over while the gesture is held is SET to the target
    value - not toggled. Wandering back over a cell you already painted
    leaves it painted.
  - Releasing anywhere ends the gesture.

The grid itself is gesture-agnostic: `PaintGesture` is a value the front
end holds (at most one at a time) and replays onto the grid as the pointer
moves.
*/

/// A paint gesture in progress: remembers the value the initial press
/// decided on, so dragging applies it uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintGesture {
    value: bool,
}

impl PaintGesture {
    pub fn value(&self) -> bool {
        self.value
    }
}

/// Boolean track × step matrix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGrid {
    tracks: usize,
    steps: usize,
    cells: Vec<bool>, // row-major: track * steps + step
}

impl StepGrid {
    pub fn new(tracks: usize, steps: usize) -> Self {
        Self {
            tracks,
            steps,
            cells: vec![false; tracks * steps],
        }
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    fn index(&self, track: usize, step: usize) -> usize {
        debug_assert!(track < self.tracks && step < self.steps);
        track * self.steps + step
    }

    pub fn get(&self, track: usize, step: usize) -> bool {
        self.cells[self.index(track, step)]
    }

    pub fn set(&mut self, track: usize, step: usize, value: bool) {
        let index = self.index(track, step);
        self.cells[index] = value;
    }

    /// Start a paint gesture on a cell: the cell flips, and the gesture
    /// carries the new value for the rest of the drag.
    pub fn begin_paint(&mut self, track: usize, step: usize) -> PaintGesture {
        let value = !self.get(track, step);
        self.set(track, step, value);
        PaintGesture { value }
    }

    /// Apply an in-progress gesture to a cell.
    pub fn paint(&mut self, gesture: PaintGesture, track: usize, step: usize) {
        self.set(track, step, gesture.value);
    }

    /// One column of the grid: which tracks fire at this step.
    pub fn active_tracks_at(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.tracks).filter(move |&track| self.get(track, step))
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| !c)
    }
}
