//! Button callback identifiers
//!
//! Every button the controller renders carries an opaque id of the form
//! `action` or `action_parameter`. Sections are encoded by their slug
//! ([`Section::key`]), which never contains `_`, so ids stay unambiguous even
//! for "On Progress". Ids built from display names, including the
//! `clear_<Section>_notes` form, are still accepted when decoding.

use std::fmt;
use std::str::FromStr;

use crate::models::{NoteError, Section};

/// A decoded button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Add(Section),
    EditMenu,
    Edit(Section),
    DeleteMenu,
    Delete(Section),
    DeleteAt(Section, usize),
    MoveMenu,
    Move(Section),
    MoveTarget(Section),
    Show,
    ClearMenu,
    ClearAll,
    Clear(Section),
    Cancel,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Add(section) => write!(f, "add_{}", section.key()),
            Callback::EditMenu => f.write_str("edit_note"),
            Callback::Edit(section) => write!(f, "edit_{}", section.key()),
            Callback::DeleteMenu => f.write_str("delete_note"),
            Callback::Delete(section) => write!(f, "delete_{}", section.key()),
            Callback::DeleteAt(section, index) => write!(f, "delete_{}_{}", section.key(), index),
            Callback::MoveMenu => f.write_str("move_note"),
            Callback::Move(section) => write!(f, "move_{}", section.key()),
            Callback::MoveTarget(section) => write!(f, "moveto_{}", section.key()),
            Callback::Show => f.write_str("show_notes"),
            Callback::ClearMenu => f.write_str("clear_notes"),
            Callback::ClearAll => f.write_str("clear_all"),
            Callback::Clear(section) => write!(f, "clear_{}", section.key()),
            Callback::Cancel => f.write_str("cancel"),
        }
    }
}

impl FromStr for Callback {
    type Err = NoteError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let unknown = || NoteError::UnknownCallback(id.to_string());
        let section = |param: &str| Section::parse(param).map_err(|_| unknown());

        let (action, param) = match id.split_once('_') {
            Some((action, param)) => (action, Some(param)),
            None => (id, None),
        };

        match (action, param) {
            ("cancel", None) => Ok(Callback::Cancel),
            ("add", Some(p)) => section(p).map(Callback::Add),
            ("edit", Some("note")) => Ok(Callback::EditMenu),
            ("edit", Some(p)) => section(p).map(Callback::Edit),
            ("delete", Some("note")) => Ok(Callback::DeleteMenu),
            ("delete", Some(p)) => match p.rsplit_once('_') {
                Some((name, index)) => {
                    let index = index.parse::<usize>().map_err(|_| unknown())?;
                    Ok(Callback::DeleteAt(section(name)?, index))
                }
                None => section(p).map(Callback::Delete),
            },
            ("move", Some("note")) => Ok(Callback::MoveMenu),
            ("move", Some(p)) => section(p).map(Callback::Move),
            ("moveto", Some(p)) => section(p).map(Callback::MoveTarget),
            ("show", Some("notes")) => Ok(Callback::Show),
            ("clear", Some("notes")) => Ok(Callback::ClearMenu),
            ("clear", Some(p)) => match p.strip_suffix("_notes").unwrap_or(p) {
                "all" => Ok(Callback::ClearAll),
                p => section(p).map(Callback::Clear),
            },
            _ => Err(unknown()),
        }
    }
}
