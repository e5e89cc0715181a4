//! Client module
//!
//! This module provides clients for the handover service: one that goes over
//! HTTP and one that calls the in-process core directly.

mod core;
mod http;
mod trait_def;

// Re-export the trait and types
pub use self::core::CoreClient;
pub use self::http::{ClientConfig, ClientError, HttpClientImpl};
pub use self::trait_def::Client;
