//! Conversation controller
//!
//! Turns an inbound [`Event`] plus the sender's [`SessionState`] into a
//! [`Response`], mutating the [`NoteStore`] along the way. The controller has
//! no knowledge of the transport: gateways render [`Response`]s and feed
//! events back in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::callback::Callback;
use crate::models::{numbered, parse_index, ClearTarget, NoteError, NoteStore, Section};
use crate::session::{Mode, SessionState, UserKey};

const MENU_PROMPT: &str = "Choose an action:";
const USE_MENU_FIRST: &str = "Please use the menu to select a section first.";
const INVALID_NUMBER: &str = "Invalid note number. Please try again.";
const NOT_A_NUMBER: &str = "Please enter a valid number.";
const EMPTY_NOTE: &str = "Note text cannot be empty.";
const STALE_BUTTON: &str = "That button is no longer valid.";

/// An inbound event from a gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A slash command, with or without the leading `/`
    Command(String),
    /// A button press carrying the button's callback id
    ButtonPress(String),
    /// Any other text the user typed
    TextMessage(String),
}

/// Commands understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Show,
    Clear,
    Menu,
    Cancel,
}

impl Command {
    pub fn parse(name: &str) -> Option<Command> {
        let name = name.trim().trim_start_matches('/');
        // Telegram-style "/show@SomeBot" addressing
        let name = name.split('@').next().unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "show" => Some(Command::Show),
            "clear" => Some(Command::Clear),
            "menu" => Some(Command::Menu),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// A menu button: what the user sees and the id sent back when pressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub callback_id: String,
}

impl Button {
    pub fn new(label: impl Into<String>, callback: Callback) -> Self {
        Self {
            label: label.into(),
            callback_id: callback.to_string(),
        }
    }
}

/// What the gateway should show the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub menu: Option<Vec<Button>>,
    /// Replace the message whose button triggered this response
    pub edit_in_place: bool,
    /// Follow this response with the main menu
    pub show_menu_after: bool,
}

impl Response {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
            edit_in_place: false,
            show_menu_after: false,
        }
    }

    pub fn with_menu(mut self, menu: Vec<Button>) -> Self {
        self.menu = Some(menu);
        self
    }

    pub fn edit_in_place(mut self) -> Self {
        self.edit_in_place = true;
        self
    }

    pub fn then_menu(mut self) -> Self {
        self.show_menu_after = true;
        self
    }

    /// The main menu message gateways render when `show_menu_after` is set
    pub fn main_menu() -> Self {
        Self::reply(MENU_PROMPT).with_menu(main_menu())
    }
}

/// Buttons of the main menu, in display order
pub fn main_menu() -> Vec<Button> {
    let mut menu: Vec<Button> = Section::ALL
        .into_iter()
        .map(|section| Button::new(section.name(), Callback::Add(section)))
        .collect();
    menu.extend([
        Button::new("Edit Note", Callback::EditMenu),
        Button::new("Delete Note", Callback::DeleteMenu),
        Button::new("Move Note", Callback::MoveMenu),
        Button::new("Show Notes", Callback::Show),
        Button::new("Clear Notes", Callback::ClearMenu),
    ]);
    menu
}

fn cancel_button() -> Button {
    Button::new("Cancel", Callback::Cancel)
}

fn greeting() -> String {
    let sections: String = Section::ALL
        .iter()
        .map(|s| format!("- {}\n", s.name()))
        .collect();
    format!(
        "Hello! I am your Handover Notes Bot.\n\
         You can add notes to the following sections:\n\
         {sections}\n\
         Commands:\n\
         - /show : Show all handover notes.\n\
         - /clear : Clear all notes.\n\
         - /menu : Show the main menu.\n\
         - /cancel : Cancel the current operation."
    )
}

/// The three operations that start by picking a section and then a note number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Edit,
    Delete,
    Move,
}

impl Pick {
    fn verb(self) -> &'static str {
        match self {
            Pick::Edit => "edit",
            Pick::Delete => "delete",
            Pick::Move => "move",
        }
    }

    fn label(self, section: Section) -> String {
        match self {
            Pick::Edit => format!("Edit {section}"),
            Pick::Delete => format!("Delete from {section}"),
            Pick::Move => format!("Move from {section}"),
        }
    }

    fn callback(self, section: Section) -> Callback {
        match self {
            Pick::Edit => Callback::Edit(section),
            Pick::Delete => Callback::Delete(section),
            Pick::Move => Callback::Move(section),
        }
    }

    fn mode(self, section: Section) -> Mode {
        match self {
            Pick::Edit => Mode::AwaitingEditIndex { section },
            Pick::Delete => Mode::AwaitingDeleteIndex { section },
            Pick::Move => Mode::AwaitingMoveIndex { section },
        }
    }
}

/// Owns the shared notes and every user's session
#[derive(Debug, Default)]
pub struct Controller {
    store: NoteStore,
    sessions: HashMap<UserKey, SessionState>,
}

impl Controller {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            sessions: HashMap::new(),
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// The user's current mode; users never seen before are idle
    pub fn mode(&self, user: &UserKey) -> Mode {
        self.sessions
            .get(user)
            .map(|s| s.mode().clone())
            .unwrap_or_default()
    }

    /// Handles one event from `user`
    pub fn handle(&mut self, user: &UserKey, event: Event) -> Response {
        let session = self.sessions.entry(user.clone()).or_default();
        let before = session.mode().name();

        let response = step(&mut self.store, session, event);

        debug!(
            user = %user,
            from = before,
            to = session.mode().name(),
            show_menu_after = response.show_menu_after,
            "transition"
        );
        if session.is_idle() {
            self.sessions.remove(user);
        }
        response
    }
}

/// Puts a note held by a pending move back into its section, so indexes
/// match what the user was shown.
fn restore_held_note(store: &mut NoteStore, session: &mut SessionState) {
    if matches!(session.mode(), Mode::AwaitingMoveTarget { .. }) {
        abandon(store, session);
    }
}

/// Leaves the current mode. A move that already took its note out of the
/// source section puts it back where it was.
fn abandon(store: &mut NoteStore, session: &mut SessionState) {
    if let Mode::AwaitingMoveTarget {
        source,
        index,
        note,
    } = session.reset()
    {
        let position = store.insert(source, index, note);
        info!(section = %source, position, "restored note from abandoned move");
    }
}

fn step(store: &mut NoteStore, session: &mut SessionState, event: Event) -> Response {
    match event {
        Event::Command(name) => match Command::parse(&name) {
            Some(command) => on_command(store, session, command),
            None => {
                warn!(command = %name, "unknown command");
                Response::reply(format!("Unknown command: {}", name.trim()))
                    .with_menu(main_menu())
            }
        },
        Event::ButtonPress(id) => match id.parse::<Callback>() {
            Ok(callback) => on_button(store, session, callback),
            Err(e) => {
                warn!(error = %e, "rejected button press");
                Response::reply(STALE_BUTTON).then_menu()
            }
        },
        Event::TextMessage(body) => on_text(store, session, body),
    }
}

fn on_command(store: &mut NoteStore, session: &mut SessionState, command: Command) -> Response {
    match command {
        Command::Start => {
            abandon(store, session);
            Response::reply(greeting()).then_menu()
        }
        Command::Menu => Response::main_menu(),
        Command::Show => Response::reply(store.board().render()).with_menu(main_menu()),
        Command::Clear => clear(store, session, ClearTarget::All),
        Command::Cancel => cancel(store, session),
    }
}

fn on_button(store: &mut NoteStore, session: &mut SessionState, callback: Callback) -> Response {
    match callback {
        Callback::Add(section) => {
            abandon(store, session);
            session.enter(Mode::AwaitingNoteText { section });
            Response::reply(format!(
                "You selected: {section}. Please type your note."
            ))
            .with_menu(vec![cancel_button()])
            .edit_in_place()
        }
        Callback::EditMenu => section_menu(store, session, Pick::Edit),
        Callback::DeleteMenu => section_menu(store, session, Pick::Delete),
        Callback::MoveMenu => section_menu(store, session, Pick::Move),
        Callback::Edit(section) => pick_section(store, session, Pick::Edit, section),
        Callback::Delete(section) => pick_section(store, session, Pick::Delete, section),
        Callback::Move(section) => pick_section(store, session, Pick::Move, section),
        Callback::DeleteAt(section, index) => {
            restore_held_note(store, session);
            match store.remove_at(section, index) {
                Ok(note) => {
                    info!(section = %section, index, "deleted note");
                    abandon(store, session);
                    Response::reply(format!("Deleted note: {note}"))
                        .edit_in_place()
                        .then_menu()
                }
                Err(e) => {
                    warn!(error = %e, "stale delete button");
                    let response = Response::reply(INVALID_NUMBER);
                    if session.is_idle() {
                        response.then_menu()
                    } else {
                        response
                    }
                }
            }
        }
        Callback::MoveTarget(target) => match session.mode().clone() {
            Mode::AwaitingMoveTarget { note, .. } => {
                session.reset();
                store.append(target, note.clone());
                info!(section = %target, "moved note");
                Response::reply(format!("Moved to {target}: {note}"))
                    .edit_in_place()
                    .then_menu()
            }
            _ => {
                warn!(section = %target, "move target pressed without a pending move");
                Response::reply("There is no note waiting to be moved.").then_menu()
            }
        },
        Callback::Show => Response::reply(store.board().render())
            .with_menu(main_menu())
            .edit_in_place(),
        Callback::ClearMenu => {
            let mut menu = vec![Button::new("Clear All Notes", Callback::ClearAll)];
            menu.extend(Section::ALL.into_iter().map(|section| {
                Button::new(format!("Clear {section} Notes"), Callback::Clear(section))
            }));
            menu.push(cancel_button());
            Response::reply("Select what to clear:")
                .with_menu(menu)
                .edit_in_place()
        }
        Callback::ClearAll => clear(store, session, ClearTarget::All).edit_in_place(),
        Callback::Clear(section) => {
            clear(store, session, ClearTarget::Section(section)).edit_in_place()
        }
        Callback::Cancel => cancel(store, session).edit_in_place(),
    }
}

fn cancel(store: &mut NoteStore, session: &mut SessionState) -> Response {
    abandon(store, session);
    Response::reply("Operation cancelled.").with_menu(main_menu())
}

fn clear(store: &mut NoteStore, session: &mut SessionState, target: ClearTarget) -> Response {
    abandon(store, session);
    let dropped = store.clear(target);
    info!(?target, dropped, "cleared notes");
    let text = match target {
        ClearTarget::All => "All handover notes have been cleared.".to_string(),
        ClearTarget::Section(section) => format!("All {section} notes have been cleared."),
    };
    Response::reply(text).then_menu()
}

/// Offers the non-empty sections for an edit, delete or move
fn section_menu(store: &mut NoteStore, session: &mut SessionState, pick: Pick) -> Response {
    restore_held_note(store, session);
    let sections = store.non_empty_sections();
    if sections.is_empty() {
        abandon(store, session);
        debug!(error = %NoteError::NoSectionAvailable, verb = pick.verb(), "nothing to pick");
        return Response::reply(format!("No notes available to {}.", pick.verb()))
            .edit_in_place()
            .then_menu();
    }

    let mut menu: Vec<Button> = sections
        .into_iter()
        .map(|section| Button::new(pick.label(section), pick.callback(section)))
        .collect();
    menu.push(cancel_button());
    Response::reply(format!("Choose a section to {}:", pick.verb()))
        .with_menu(menu)
        .edit_in_place()
}

/// Lists a section's notes and waits for the user to type a note number
fn pick_section(
    store: &mut NoteStore,
    session: &mut SessionState,
    pick: Pick,
    section: Section,
) -> Response {
    abandon(store, session);
    if store.is_empty(section) {
        return Response::reply(format!("No notes available in {section}."))
            .edit_in_place()
            .then_menu();
    }

    session.enter(pick.mode(section));
    let notes = store.list(section);
    let text = format!(
        "Current notes in {section}:\n{}\nPlease type the number of the note you want to {}.",
        numbered(notes),
        pick.verb()
    );

    let mut menu = Vec::new();
    if pick == Pick::Delete {
        menu.extend((1..=notes.len()).map(|index| {
            Button::new(
                format!("Delete {section} - {index}"),
                Callback::DeleteAt(section, index),
            )
        }));
    }
    menu.push(cancel_button());
    Response::reply(text).with_menu(menu).edit_in_place()
}

/// Maps an index validation failure to the retry message for the same mode
fn retry(error: NoteError) -> Response {
    warn!(error = %error, "rejected note number");
    let text = match error {
        NoteError::NotAnInteger(_) => NOT_A_NUMBER,
        _ => INVALID_NUMBER,
    };
    Response::reply(text).with_menu(vec![cancel_button()])
}

fn on_text(store: &mut NoteStore, session: &mut SessionState, body: String) -> Response {
    match session.mode().clone() {
        Mode::Idle | Mode::AwaitingMoveTarget { .. } => Response::reply(USE_MENU_FIRST),

        Mode::AwaitingNoteText { section } => {
            let note = body.trim();
            if note.is_empty() {
                return Response::reply(EMPTY_NOTE).with_menu(vec![cancel_button()]);
            }
            let position = store.append(section, note);
            session.reset();
            info!(section = %section, position, "added note");
            Response::reply(format!("Added to {section}: {note}")).then_menu()
        }

        Mode::AwaitingEditIndex { section } => {
            let picked = parse_index(&body)
                .and_then(|index| store.get(section, index).map(|note| (index, note)));
            match picked {
                Ok((index, note)) => {
                    let text = format!("You selected note {index}: {note}\nPlease type the new text.");
                    session.enter(Mode::AwaitingEditText { section, index });
                    Response::reply(text).with_menu(vec![cancel_button()])
                }
                Err(e) => retry(e),
            }
        }

        Mode::AwaitingEditText { section, index } => {
            let note = body.trim();
            if note.is_empty() {
                return Response::reply(EMPTY_NOTE).with_menu(vec![cancel_button()]);
            }
            session.reset();
            match store.set(section, index, note) {
                Ok(_) => {
                    info!(section = %section, index, "updated note");
                    Response::reply(format!("Note updated in {section}: {note}")).then_menu()
                }
                // Another user removed the note while this one was typing
                Err(e) => {
                    warn!(error = %e, "edit target disappeared");
                    Response::reply(INVALID_NUMBER).then_menu()
                }
            }
        }

        Mode::AwaitingDeleteIndex { section } => {
            match parse_index(&body).and_then(|index| store.remove_at(section, index)) {
                Ok(note) => {
                    session.reset();
                    info!(section = %section, "deleted note");
                    Response::reply(format!("Deleted note: {note}")).then_menu()
                }
                Err(e) => retry(e),
            }
        }

        Mode::AwaitingMoveIndex { section } => {
            let taken = parse_index(&body)
                .and_then(|index| store.remove_at(section, index).map(|note| (index, note)));
            match taken {
                Ok((index, note)) => {
                    let menu: Vec<Button> = Section::ALL
                        .into_iter()
                        .filter(|s| *s != section)
                        .map(|s| Button::new(s.name(), Callback::MoveTarget(s)))
                        .chain(std::iter::once(cancel_button()))
                        .collect();
                    let text = format!("Move \"{note}\" to which section?");
                    session.enter(Mode::AwaitingMoveTarget {
                        source: section,
                        index,
                        note,
                    });
                    Response::reply(text).with_menu(menu)
                }
                Err(e) => retry(e),
            }
        }
    }
}
