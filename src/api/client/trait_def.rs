//! Client trait definition
//!
//! This module defines the `Client` trait that abstracts over different client implementations.

use super::ClientError;
use crate::controller::{Event, Response};
use crate::models::{Board, Section};
use crate::session::{Mode, UserKey};

/// Trait defining what a gateway needs from the handover service
#[async_trait::async_trait]
pub trait Client {
    /// Deliver one event on behalf of `user`
    async fn send_event(&self, user: &UserKey, event: Event) -> Result<Response, ClientError>;

    /// Get every section's notes
    async fn board(&self) -> Result<Board, ClientError>;

    /// Get one section's notes
    async fn section(&self, section: Section) -> Result<Vec<String>, ClientError>;

    /// Get the conversation mode of `user`
    async fn session(&self, user: &UserKey) -> Result<Mode, ClientError>;
}
