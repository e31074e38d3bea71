//! Page-level handlers behind the edge gate.
//!
//! The real UI lives elsewhere; these exist so the two-layer auth model is
//! visible end to end: the edge gate bounces cookie-less requests before
//! they get here, and the handlers still run the authoritative verifier
//! themselves - the gate is never the security boundary.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;

use crate::middleware::edge_gate::LOGIN_PATH;
use crate::AppState;

/// GET /todos - the protected todos page entry point
pub async fn todos_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Authoritative check; the edge gate only looked at cookie presence
    match state.verifier.verify(&headers).await {
        Ok(Some(session)) => Json(json!({
            "success": true,
            "data": {
                "user": session,
                "todosApi": "/api/todos",
            }
        }))
        .into_response(),
        Ok(None) => Redirect::temporary(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::warn!("session verification failed on page request: {}", e);
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}

/// GET /auth/login - login entry point (authentication itself is handled by
/// the external auth service)
pub async fn login_page(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "message": "Sign in via the auth service, then retry with its session cookie",
            "authService": state.config.auth.base_url,
        }
    }))
}
