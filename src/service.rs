//! Shared, thread-safe access to the controller
//!
//! Gateways may run handlers concurrently; every event goes through a single
//! lock so mutations of the note store are applied one at a time and index
//! checks never race with removals.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::controller::{Controller, Event, Response};
use crate::models::{Board, Section};
use crate::session::{Mode, UserKey};

#[derive(Clone, Default)]
pub struct Core {
    inner: Arc<Mutex<Controller>>,
}

impl Core {
    pub fn new(controller: Controller) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Controller> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // Helper method to run a closure against the controller under the lock
    fn with_controller<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Controller) -> R,
    {
        let mut controller = self.lock();
        f(&mut controller)
    }

    /// Handles one inbound event for `user`
    pub fn handle(&self, user: &UserKey, event: Event) -> Response {
        self.with_controller(|controller| controller.handle(user, event))
    }

    /// A copy of every section's notes
    pub fn board(&self) -> Board {
        self.lock().store().board()
    }

    /// A copy of one section's notes
    pub fn section(&self, section: Section) -> Vec<String> {
        self.lock().store().list(section).to_vec()
    }

    /// The current mode of `user`
    pub fn mode(&self, user: &UserKey) -> Mode {
        self.lock().mode(user)
    }
}
