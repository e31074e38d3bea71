use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod testing;
pub mod validation;

use auth::SessionVerifier;
use config::AppConfig;
use database::store::TodoStore;

/// Shared per-process state, constructed once in `main` and injected
/// everywhere. The pool behind `store` is the only cross-request resource.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn TodoStore>,
    pub verifier: Arc<dyn SessionVerifier>,
}

/// Build the full router for the given state
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(page_routes(state.clone()))
        .merge(todo_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Protected API routes: the auth middleware is the authoritative session
/// check and injects `Session` for the handlers.
fn todo_routes(state: AppState) -> Router<AppState> {
    use handlers::todos;

    Router::new()
        .route("/api/todos", get(todos::list).post(todos::create))
        .route("/api/todos/:id", put(todos::update).delete(todos::delete))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::session_auth,
        ))
}

/// Page routes: the edge gate's cookie pre-check covers /todos only; the
/// login entry point stays reachable without a cookie.
fn page_routes(state: AppState) -> Router<AppState> {
    use handlers::pages;

    Router::new()
        .route("/todos", get(pages::todos_page))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::edge_gate,
        ))
        .route(middleware::edge_gate::LOGIN_PATH, get(pages::login_page))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": version,
            "description": "Session-gated, owner-scoped todo CRUD API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public)",
                "todos_page": "/todos (protected - edge gated)",
                "todos": "/api/todos[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
