//! The cursor over the date axis and the playback state machine.

use serde::{Deserialize, Serialize};

use crate::{DateAxis, DomainError, IsoDate};

/// Whether a recurring playback timer should currently be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Outcome of `Timeline::begin_playback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStart {
    /// Cursor was at the end of the axis and rewound to the first date.
    Rewound,
    /// Playback continues from the current cursor.
    FromCurrent,
    /// Playback was already running; nothing changed.
    AlreadyPlaying,
}

/// Outcome of `Timeline::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor advanced to this index; playback continues.
    Advanced(usize),
    /// Cursor sits at the last index; playback stopped.
    Finished(usize),
    /// Tick arrived while stopped (stale timer); no state change.
    Ignored,
}

/// Cursor over the date axis plus the playback state machine.
///
/// Owns no timer: the hosting application arms and cancels the recurring
/// tick source and feeds `tick()` back in.
#[derive(Debug, Clone)]
pub struct Timeline {
    axis: DateAxis,
    cursor: usize,
    playback: PlaybackState,
}

impl Timeline {
    /// Starts at the most recent date, stopped.
    pub fn new(axis: DateAxis) -> Self {
        let cursor = axis.last_index();
        Self {
            axis,
            cursor,
            playback: PlaybackState::Stopped,
        }
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// The date under the cursor. The cursor is always in range.
    pub fn current_date(&self) -> &IsoDate {
        &self.axis.dates()[self.cursor]
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.axis.last_index()
    }

    /// Move the cursor. Rejects out-of-range instead of clamping: slider
    /// handlers produce in-range indices by construction, so a rejection
    /// means a broken caller and must not silently change state.
    pub fn set_cursor(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.axis.len() {
            return Err(DomainError::CursorOutOfRange {
                index,
                len: self.axis.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Move the cursor back to the most recent date (the unfiltered view).
    pub fn reset(&mut self) {
        self.cursor = self.axis.last_index();
    }

    /// `Stopped -> Playing`. A cursor already at the end of the axis rewinds
    /// to the first date so playback replays the whole history.
    pub fn begin_playback(&mut self) -> PlaybackStart {
        if self.is_playing() {
            return PlaybackStart::AlreadyPlaying;
        }
        self.playback = PlaybackState::Playing;
        if self.at_end() {
            self.cursor = 0;
            PlaybackStart::Rewound
        } else {
            PlaybackStart::FromCurrent
        }
    }

    /// Advance one step. The tick that lands on the last index stops
    /// playback; so does a stray tick arriving while already there.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Ignored;
        }
        if self.at_end() {
            self.playback = PlaybackState::Stopped;
            return TickOutcome::Finished(self.cursor);
        }

        self.cursor += 1;
        if self.at_end() {
            self.playback = PlaybackState::Stopped;
            TickOutcome::Finished(self.cursor)
        } else {
            TickOutcome::Advanced(self.cursor)
        }
    }

    /// `Playing -> Stopped`. Idempotent.
    pub fn stop_playback(&mut self) {
        self.playback = PlaybackState::Stopped;
    }
}
