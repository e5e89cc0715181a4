//! Core models for the handover library
//!
//! This module contains the fixed note sections, the in-memory note store and
//! the error type shared by the store and the conversation controller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fixed buckets a handover note can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "Issue")]
    Issue,
    #[serde(rename = "On Progress")]
    OnProgress,
    #[serde(rename = "Done")]
    Done,
}

impl Section {
    /// Every section, in display order
    pub const ALL: [Section; 3] = [Section::Issue, Section::OnProgress, Section::Done];

    /// The display name shown to users
    pub fn name(self) -> &'static str {
        match self {
            Section::Issue => "Issue",
            Section::OnProgress => "On Progress",
            Section::Done => "Done",
        }
    }

    /// Short slug used inside button callback ids and URLs.
    /// Never contains whitespace or `_`.
    pub fn key(self) -> &'static str {
        match self {
            Section::Issue => "issue",
            Section::OnProgress => "progress",
            Section::Done => "done",
        }
    }

    fn position(self) -> usize {
        match self {
            Section::Issue => 0,
            Section::OnProgress => 1,
            Section::Done => 2,
        }
    }

    /// Resolves a section from its slug or from its display name.
    ///
    /// Display names are compared case-sensitively after title-casing the
    /// input, so `"on progress"` and `"ON  PROGRESS"` both resolve.
    pub fn parse(input: &str) -> Result<Section, NoteError> {
        let trimmed = input.trim();
        if let Some(section) = Section::ALL.iter().find(|s| s.key() == trimmed) {
            return Ok(*section);
        }

        let normalized = title_case(trimmed);
        Section::ALL
            .iter()
            .find(|s| s.name() == normalized)
            .copied()
            .ok_or_else(|| NoteError::InvalidSection(input.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest,
/// collapsing runs of whitespace into a single space
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a 1-based note number typed by a user
pub fn parse_index(input: &str) -> Result<usize, NoteError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| NoteError::NotAnInteger(input.trim().to_string()))
}

/// Errors produced by note store operations and input validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("Invalid section: {0}")]
    InvalidSection(String),

    #[error("Note {index} is out of range for {section} ({len} notes)")]
    IndexOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },

    #[error("Not a number: {0:?}")]
    NotAnInteger(String),

    #[error("No section has notes available")]
    NoSectionAvailable,

    #[error("Unknown button: {0}")]
    UnknownCallback(String),
}

/// What a clear operation empties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearTarget {
    All,
    Section(Section),
}

/// The shared handover notes, one ordered list per section.
///
/// Note positions are 1-based everywhere in the public API and shift
/// whenever an earlier note in the same section is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteStore {
    notes: [Vec<String>; 3],
}

impl NoteStore {
    /// Creates a store with every section empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a 1-based position into a slot, checking the range
    fn slot(&self, section: Section, index: usize) -> Result<usize, NoteError> {
        let len = self.len(section);
        if index == 0 || index > len {
            return Err(NoteError::IndexOutOfRange {
                section,
                index,
                len,
            });
        }
        Ok(index - 1)
    }

    /// Appends a note to the end of a section, returning its position
    pub fn append(&mut self, section: Section, text: impl Into<String>) -> usize {
        let notes = &mut self.notes[section.position()];
        notes.push(text.into());
        notes.len()
    }

    /// Inserts a note at a 1-based position, clamped to `[1, len + 1]`.
    /// Returns the position the note landed at.
    pub fn insert(&mut self, section: Section, index: usize, text: impl Into<String>) -> usize {
        let notes = &mut self.notes[section.position()];
        let slot = index.saturating_sub(1).min(notes.len());
        notes.insert(slot, text.into());
        slot + 1
    }

    /// The notes of a section in order
    pub fn list(&self, section: Section) -> &[String] {
        &self.notes[section.position()]
    }

    pub fn get(&self, section: Section, index: usize) -> Result<&str, NoteError> {
        let slot = self.slot(section, index)?;
        Ok(&self.notes[section.position()][slot])
    }

    /// Replaces the note at `index`, returning the previous text
    pub fn set(
        &mut self,
        section: Section,
        index: usize,
        text: impl Into<String>,
    ) -> Result<String, NoteError> {
        let slot = self.slot(section, index)?;
        Ok(std::mem::replace(
            &mut self.notes[section.position()][slot],
            text.into(),
        ))
    }

    /// Removes and returns the note at `index`, shifting later notes left
    pub fn remove_at(&mut self, section: Section, index: usize) -> Result<String, NoteError> {
        let slot = self.slot(section, index)?;
        Ok(self.notes[section.position()].remove(slot))
    }

    /// Moves a note to the end of another section in one step
    pub fn move_note(
        &mut self,
        from: Section,
        index: usize,
        to: Section,
    ) -> Result<String, NoteError> {
        let note = self.remove_at(from, index)?;
        self.append(to, note.clone());
        Ok(note)
    }

    /// Empties one section or all of them, returning how many notes were dropped
    pub fn clear(&mut self, target: ClearTarget) -> usize {
        match target {
            ClearTarget::All => self
                .notes
                .iter_mut()
                .map(|notes| {
                    let dropped = notes.len();
                    notes.clear();
                    dropped
                })
                .sum(),
            ClearTarget::Section(section) => {
                let notes = &mut self.notes[section.position()];
                let dropped = notes.len();
                notes.clear();
                dropped
            }
        }
    }

    pub fn len(&self, section: Section) -> usize {
        self.list(section).len()
    }

    pub fn is_empty(&self, section: Section) -> bool {
        self.list(section).is_empty()
    }

    /// Number of notes across every section
    pub fn total(&self) -> usize {
        self.notes.iter().map(Vec::len).sum()
    }

    /// Sections that currently hold at least one note, in display order
    pub fn non_empty_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| !self.is_empty(*s))
            .collect()
    }

    /// A copy of every section's notes
    pub fn board(&self) -> Board {
        Board {
            sections: Section::ALL
                .into_iter()
                .map(|section| SectionNotes {
                    section,
                    notes: self.list(section).to_vec(),
                })
                .collect(),
        }
    }
}

/// A point-in-time copy of the whole store, as handed to gateways
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub sections: Vec<SectionNotes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNotes {
    #[serde(rename = "name")]
    pub section: Section,
    pub notes: Vec<String>,
}

impl Board {
    /// Renders the full listing shown by "show notes"
    pub fn render(&self) -> String {
        let mut message = String::from("Handover Notes:\n\n");
        for entry in &self.sections {
            message.push_str(&format!("{}:\n", entry.section));
            if entry.notes.is_empty() {
                message.push_str("  -\n");
            } else {
                message.push_str(&numbered(&entry.notes));
            }
            message.push('\n');
        }
        message
    }
}

/// Formats notes as an indented, 1-based numbered list
pub fn numbered(notes: &[String]) -> String {
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| format!("  {}. {}\n", i + 1, note))
        .collect()
}
