//! Navigation over the fetched event list.
//!
//! Moves clamp at both ends instead of wrapping. Hitting the end is the one
//! place navigation closes the conversation; hitting the start keeps it open.

use encore_common::EventRecord;

use crate::session::SessionState;

/// Result of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The cursor moved to a valid position.
    Moved,
    /// Already at the first event; position unchanged.
    AtStart,
    /// Already at the last event; position unchanged.
    AtEnd,
    /// An explicit jump target outside the list; position unchanged.
    OutOfRange,
}

impl SessionState {
    /// Rewind to the first event for a fresh list view. The cached list
    /// itself stays; a conversation never re-fetches.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The event under the cursor, if any.
    pub fn current(&self) -> Option<&EventRecord> {
        self.events.get(self.cursor)
    }

    pub fn advance(&mut self) -> NavOutcome {
        if self.cursor + 1 < self.events.len() {
            self.cursor += 1;
            NavOutcome::Moved
        } else {
            NavOutcome::AtEnd
        }
    }

    pub fn retreat(&mut self) -> NavOutcome {
        if self.cursor > 0 {
            self.cursor -= 1;
            NavOutcome::Moved
        } else {
            NavOutcome::AtStart
        }
    }

    /// Jump straight to index `i` (0-based). Out-of-range jumps are
    /// rejected rather than clamped.
    pub fn select(&mut self, i: usize) -> NavOutcome {
        if i < self.events.len() {
            self.cursor = i;
            NavOutcome::Moved
        } else {
            NavOutcome::OutOfRange
        }
    }
}
