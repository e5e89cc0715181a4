use axum::body::Body;
use axum::http::{Request, StatusCode};
use handover::api::router;
use handover::Core;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(core: &Core, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(core.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_event(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/events")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_add_note_over_http() {
    let core = Core::default();

    let (status, body) = send(
        &core,
        post_event(json!({"user": "42", "event": {"button_press": "add_issue"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["text"],
        "You selected: Issue. Please type your note."
    );
    assert_eq!(body["data"]["edit_in_place"], true);
    assert_eq!(body["data"]["menu"][0]["callback_id"], "cancel");

    let (_, body) = send(&core, get("/api/sessions/42")).await;
    assert_eq!(
        body["data"],
        json!({"mode": "awaiting_note_text", "section": "Issue"})
    );

    let (_, body) = send(
        &core,
        post_event(json!({"user": "42", "event": {"text_message": "server down"}})),
    )
    .await;
    assert_eq!(body["data"]["text"], "Added to Issue: server down");
    assert_eq!(body["data"]["show_menu_after"], true);

    let (status, body) = send(&core, get("/api/notes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["sections"][0],
        json!({"name": "Issue", "notes": ["server down"]})
    );
}

#[tokio::test]
async fn test_section_lookup_normalizes_names() {
    let core = Core::default();
    send(
        &core,
        post_event(json!({"user": "7", "event": {"button_press": "add_progress"}})),
    )
    .await;
    send(
        &core,
        post_event(json!({"user": "7", "event": {"text_message": "deploying"}})),
    )
    .await;

    let (status, body) = send(&core, get("/api/notes/progress")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["deploying"]));

    let (status, body) = send(&core, get("/api/notes/on%20progress")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["deploying"]));

    let (status, body) = send(&core, get("/api/notes/backlog")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid section: backlog");
}

#[tokio::test]
async fn test_commands_over_http() {
    let core = Core::default();

    let (_, body) = send(
        &core,
        post_event(json!({"user": "1", "event": {"command": "/start"}})),
    )
    .await;
    assert_eq!(body["data"]["show_menu_after"], true);

    let (_, body) = send(
        &core,
        post_event(json!({"user": "1", "event": {"text_message": "hello"}})),
    )
    .await;
    assert_eq!(
        body["data"]["text"],
        "Please use the menu to select a section first."
    );
}

#[tokio::test]
async fn test_ui_escapes_note_text() {
    let core = Core::default();
    send(
        &core,
        post_event(json!({"user": "u", "event": {"button_press": "add_done"}})),
    )
    .await;
    send(
        &core,
        post_event(json!({"user": "u", "event": {"text_message": "<b>rebooted</b>"}})),
    )
    .await;

    let response = router(core.clone()).oneshot(get("/ui")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(html.contains("<li>&lt;b&gt;rebooted&lt;/b&gt;</li>"));
    assert!(html.contains("<h2>On Progress</h2><p>-</p>"));
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let core = Core::default();

    let response = router(core.clone())
        .oneshot(post_event(json!({"user": "u", "event": {"shout": "hi"}})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(core.board().sections.iter().map(|s| s.notes.len()).sum::<usize>(), 0);
}
