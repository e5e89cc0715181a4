//! HTTP client
//!
//! Talks to a running gateway server over its JSON API.

use std::sync::Arc;

use reqwest::{Client as ReqwestClient, Error as ReqwestError, IntoUrl, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::controller::{Event, Response};
use crate::models::{Board, Section};
use crate::session::{Mode, UserKey};

/// API client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Generic API response structure
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, ClientError> {
        if self.success {
            self.data.ok_or(ClientError::MissingData)
        } else {
            Err(ClientError::Api(
                self.error
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            ))
        }
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    #[error("API error: {0}")]
    Api(String),

    #[error("Missing data in response")]
    MissingData,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// API client for a handover gateway server
#[derive(Debug, Clone)]
pub struct HttpClientImpl {
    http_client: Arc<ReqwestClient>,
    config: ClientConfig,
}

impl HttpClientImpl {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http_client: Arc::new(ReqwestClient::new()),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// URL of a user's session; the key is percent-encoded as one path segment
    fn session_url(&self, user: &UserKey) -> Result<Url, ClientError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(["api", "sessions", user.as_str()]);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: impl IntoUrl) -> Result<T, ClientError> {
        let response = self.http_client.get(url).send().await?;
        let api_response: ApiResponse<T> = response.json().await?;
        api_response.into_result()
    }
}

impl Default for HttpClientImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Client for HttpClientImpl {
    async fn send_event(&self, user: &UserKey, event: Event) -> Result<Response, ClientError> {
        #[derive(Serialize)]
        struct EventRequest<'a> {
            user: &'a UserKey,
            event: Event,
        }

        let request = EventRequest { user, event };
        let response = self
            .http_client
            .post(self.url("/api/events"))
            .json(&request)
            .send()
            .await?;
        let api_response: ApiResponse<Response> = response.json().await?;
        api_response.into_result()
    }

    async fn board(&self) -> Result<Board, ClientError> {
        self.get_json(self.url("/api/notes")).await
    }

    async fn section(&self, section: Section) -> Result<Vec<String>, ClientError> {
        self.get_json(self.url(&format!("/api/notes/{}", section.key())))
            .await
    }

    async fn session(&self, user: &UserKey) -> Result<Mode, ClientError> {
        self.get_json(self.session_url(user)?).await
    }
}
