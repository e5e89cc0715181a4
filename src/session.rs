//! Per-user conversation state
//!
//! Each user has exactly one [`Mode`] at a time. Every piece of data an
//! unfinished operation needs travels inside its mode variant, so returning
//! to [`Mode::Idle`] drops it all at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Section;

/// Identity of the user on the other side of the gateway
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for UserKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the controller is waiting for from a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    AwaitingNoteText {
        section: Section,
    },
    AwaitingEditIndex {
        section: Section,
    },
    AwaitingEditText {
        section: Section,
        index: usize,
    },
    AwaitingDeleteIndex {
        section: Section,
    },
    AwaitingMoveIndex {
        section: Section,
    },
    /// The note has already left `source`; `index` is where it came from so
    /// an abandoned move can put it back.
    AwaitingMoveTarget {
        source: Section,
        index: usize,
        note: String,
    },
}

impl Mode {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::AwaitingNoteText { .. } => "awaiting_note_text",
            Mode::AwaitingEditIndex { .. } => "awaiting_edit_index",
            Mode::AwaitingEditText { .. } => "awaiting_edit_text",
            Mode::AwaitingDeleteIndex { .. } => "awaiting_delete_index",
            Mode::AwaitingMoveIndex { .. } => "awaiting_move_index",
            Mode::AwaitingMoveTarget { .. } => "awaiting_move_target",
        }
    }

    /// Whether a free-text message is a valid answer in this mode
    pub fn expects_text(&self) -> bool {
        !matches!(self, Mode::Idle | Mode::AwaitingMoveTarget { .. })
    }
}

/// Transient state for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    mode: Mode,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Replaces the current mode, returning the one it displaced
    pub fn enter(&mut self, mode: Mode) -> Mode {
        std::mem::replace(&mut self.mode, mode)
    }

    /// Returns to idle, handing back whatever was pending
    pub fn reset(&mut self) -> Mode {
        self.enter(Mode::Idle)
    }

    /// The section the pending operation works on, if any
    pub fn selected_section(&self) -> Option<Section> {
        match &self.mode {
            Mode::Idle => None,
            Mode::AwaitingNoteText { section }
            | Mode::AwaitingEditIndex { section }
            | Mode::AwaitingEditText { section, .. }
            | Mode::AwaitingDeleteIndex { section }
            | Mode::AwaitingMoveIndex { section } => Some(*section),
            Mode::AwaitingMoveTarget { source, .. } => Some(*source),
        }
    }

    /// The note number chosen for the pending operation, if any
    pub fn pending_index(&self) -> Option<usize> {
        match &self.mode {
            Mode::AwaitingEditText { index, .. } | Mode::AwaitingMoveTarget { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// The note text held by a move in progress
    pub fn pending_note_text(&self) -> Option<&str> {
        match &self.mode {
            Mode::AwaitingMoveTarget { note, .. } => Some(note.as_str()),
            _ => None,
        }
    }
}
