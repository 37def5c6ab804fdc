//! Snapshot-based undo history.
//!
//! One snapshot is committed per completed stroke and per committed fill,
//! never per pointer sample, so memory grows with the number of actions
//! rather than the number of motion events. The top of the stack is the
//! state that is visible right after the latest commit.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::surface::{Pixel, RasterSurface, Snapshot};

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undo {
    /// A prior snapshot is now visible.
    Restored,
    /// Nothing left to undo to; the surface shows the blank background.
    Exhausted,
}

impl Undo {
    #[must_use]
    pub fn is_restored(self) -> bool {
        matches!(self, Self::Restored)
    }
}

/// Ordered, append-only stack of full-surface snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    snapshots: Vec<Snapshot>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of the surface's current pixels.
    pub fn commit(&mut self, surface: &RasterSurface) {
        self.snapshots.push(surface.snapshot());
    }

    /// Drop the latest snapshot and show the one beneath it.
    ///
    /// When the store empties, the surface is cleared to `background`. An
    /// undo against an already empty store leaves the surface untouched.
    pub fn undo(&mut self, surface: &mut RasterSurface, background: Pixel) -> Undo {
        if self.snapshots.pop().is_none() {
            return Undo::Exhausted;
        }
        match self.snapshots.last() {
            Some(top) => {
                surface.restore(top, background);
                Undo::Restored
            }
            None => {
                surface.clear(background);
                Undo::Exhausted
            }
        }
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// The most recent snapshot, used to repaint after a resize.
    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
