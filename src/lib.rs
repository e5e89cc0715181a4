//! Handover library crate
//!
//! A chat-bot core that lets a small team keep a shared list of handover
//! notes split into Issue / On Progress / Done. The conversation controller
//! is transport-agnostic; the HTTP server and the console chat in [`cli`] are
//! the bundled gateways.

pub mod api;
pub mod callback;
pub mod cli;
pub mod controller;
pub mod models;
pub mod service;
pub mod session;

pub use controller::{Controller, Event, Response};
pub use models::{NoteError, NoteStore, Section};
pub use service::Core;
pub use session::{Mode, SessionState, UserKey};
