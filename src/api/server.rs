//! API Server module
//!
//! This module provides the HTTP gateway: events are posted as JSON and the
//! controller's responses are returned for the caller to render.

use std::net::SocketAddr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::controller::Event;
use crate::models::{NoteError, Section};
use crate::session::UserKey;
use crate::Core;

const DEFAULT_LOG_FILTER: &str = "handover=info,tower_http=info";

/// Request carrying one inbound event
#[derive(Serialize, Deserialize)]
pub struct EventRequest {
    pub user: UserKey,
    pub event: Event,
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 3000).into(),
        }
    }
}

/// API responses
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Helper function to map lookup results to Axum responses
fn map_result<T: Serialize>(result: Result<T, NoteError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<T>::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Builds the gateway routes around a shared core
pub fn router(core: Core) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/ui") }))
        .route("/api/events", post(post_event))
        .route("/api/notes", get(get_board))
        .route("/api/notes/:section", get(get_section))
        .route("/api/sessions/:user", get(get_session))
        .route("/ui", get(ui_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(core)
}

/// Starts the API server
pub async fn serve(core: Core, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; a subscriber installed by the embedding process wins
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let app = router(core);

    tracing::info!("Starting server on {}", config.address);
    let listener = TcpListener::bind(config.address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn post_event(
    State(core): State<Core>,
    Json(payload): Json<EventRequest>,
) -> impl IntoResponse {
    let response = core.handle(&payload.user, payload.event);
    (StatusCode::OK, Json(ApiResponse::success(response)))
}

async fn get_board(State(core): State<Core>) -> impl IntoResponse {
    Json(ApiResponse::success(core.board()))
}

async fn get_section(
    State(core): State<Core>,
    Path(section): Path<String>,
) -> impl IntoResponse {
    map_result(Section::parse(&section).map(|section| core.section(section)))
}

async fn get_session(State(core): State<Core>, Path(user): Path<String>) -> impl IntoResponse {
    Json(ApiResponse::success(core.mode(&UserKey::from(user))))
}

async fn ui_handler(State(core): State<Core>) -> impl IntoResponse {
    Html(render_board_html(&core))
}

fn render_board_html(core: &Core) -> String {
    let mut html_content = String::new();
    html_content
        .push_str("<!DOCTYPE html><html><head><title>Handover Notes</title></head><body>");
    html_content.push_str("<h1>Handover Notes</h1>");

    for entry in core.board().sections {
        html_content.push_str(&format!(
            "<h2>{}</h2>",
            html_escape::encode_text(entry.section.name())
        ));
        if entry.notes.is_empty() {
            html_content.push_str("<p>-</p>");
            continue;
        }
        html_content.push_str("<ol>");
        for note in &entry.notes {
            html_content.push_str(&format!("<li>{}</li>", html_escape::encode_text(note)));
        }
        html_content.push_str("</ol>");
    }

    html_content.push_str("</body></html>");
    html_content
}
