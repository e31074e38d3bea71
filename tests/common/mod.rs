// Shared harness for router-level tests: the real router and middleware
// stack over an in-memory store and a fixed-token session verifier.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use todo_api_rust::config::AppConfig;
use todo_api_rust::testing::{MemoryTodoStore, StaticVerifier};
use todo_api_rust::{app_with_state, AppState};

pub const COOKIE_NAME: &str = "better-auth.session_token";
pub const ALICE_TOKEN: &str = "alice-session-0123456789";
pub const BOB_TOKEN: &str = "bob-session-0123456789";

/// Router wired to known sessions for alice and bob, plus a handle on the
/// store for direct assertions.
pub fn test_app() -> (Router, Arc<MemoryTodoStore>) {
    let store = Arc::new(MemoryTodoStore::new());
    let verifier = StaticVerifier::new(COOKIE_NAME)
        .with_session(ALICE_TOKEN, "alice")
        .with_session(BOB_TOKEN, "bob");

    let state = AppState {
        config: Arc::new(AppConfig::development()),
        store: store.clone(),
        verifier: Arc::new(verifier),
    };

    (app_with_state(state), store)
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, token));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Like `request`, but with a verbatim body and caller-chosen content type,
/// for requests that are deliberately not well-formed JSON.
pub fn raw_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: &str,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, token));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Run one request through the router, returning status and parsed JSON body
/// (Null for empty bodies such as redirects).
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a todo as `token` and return the response data object
pub async fn create_todo(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/api/todos",
            Some(token),
            Some(serde_json::json!({ "title": title })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}
