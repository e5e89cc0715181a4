//! Core client implementation
//!
//! This module provides a client implementation that wraps Core directly,
//! providing the same interface as HttpClientImpl but without HTTP overhead.

use super::{Client, ClientError};
use crate::controller::{Event, Response};
use crate::models::{Board, Section};
use crate::session::{Mode, UserKey};
use crate::Core;

/// A client implementation that wraps Core directly
#[derive(Clone, Default)]
pub struct CoreClient {
    core: Core,
}

impl CoreClient {
    /// Create a new CoreClient with the given Core instance
    pub fn new(core: Core) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &Core {
        &self.core
    }
}

#[async_trait::async_trait]
impl Client for CoreClient {
    async fn send_event(&self, user: &UserKey, event: Event) -> Result<Response, ClientError> {
        Ok(self.core.handle(user, event))
    }

    async fn board(&self) -> Result<Board, ClientError> {
        Ok(self.core.board())
    }

    async fn section(&self, section: Section) -> Result<Vec<String>, ClientError> {
        Ok(self.core.section(section))
    }

    async fn session(&self, user: &UserKey) -> Result<Mode, ClientError> {
        Ok(self.core.mode(user))
    }
}
