mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use todo_api_rust::config::AppConfig;
use todo_api_rust::testing::{FailingTodoStore, StaticVerifier};
use todo_api_rust::{app_with_state, AppState};

use common::{call, request, ALICE_TOKEN, COOKIE_NAME};

/// Router whose store cannot reach its database
fn unhealthy_app() -> axum::Router {
    let state = AppState {
        config: Arc::new(AppConfig::development()),
        store: Arc::new(FailingTodoStore),
        verifier: Arc::new(StaticVerifier::new(COOKIE_NAME).with_session(ALICE_TOKEN, "alice")),
    };
    app_with_state(state)
}

#[tokio::test]
async fn root_banner_uses_the_envelope() -> Result<()> {
    let (app, _) = common::test_app();

    let (status, body) = call(&app, request(Method::GET, "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Todo API (Rust)");
    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let (app, _) = common::test_app();

    let (status, body) = call(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database_as_503() -> Result<()> {
    let app = unhealthy_app();

    let (status, body) = call(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "database unavailable");
    Ok(())
}

#[tokio::test]
async fn store_failure_surfaces_as_opaque_500_envelope() -> Result<()> {
    let app = unhealthy_app();

    // Authenticated request; the failure is the database, not the session
    let (status, body) = call(&app, request(Method::GET, "/api/todos", Some(ALICE_TOKEN), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));
    Ok(())
}
