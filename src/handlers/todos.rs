//! Todo resource handlers.
//!
//! Every handler follows the same fixed sequence: session (injected by the
//! auth middleware), id format, payload validation, owner-scoped store call.
//! Each failure short-circuits with its envelope via `?` and the `From`
//! impls on `ApiError`, so a malformed id is rejected before the payload is
//! even looked at and nothing invalid reaches the store.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::response::{ApiResponse, ApiResult};
use crate::auth::Session;
use crate::database::todo::{Todo, TodoId};
use crate::validation::{validate_create, validate_update};
use crate::AppState;

/// GET /api/todos - the caller's todos, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Vec<Todo>> {
    let todos = state.store.list(&session.user_id).await?;
    Ok(ApiResponse::success(todos))
}

/// POST /api/todos - create a todo owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(body) = body?;
    let payload = validate_create(&body)?;
    let todo = state.store.create(&session.user_id, payload).await?;
    Ok(ApiResponse::created(todo))
}

/// PUT /api/todos/:id - partial field replacement on an owned todo
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Todo> {
    // Id format comes first: an unparseable body must not mask a bad id
    let id = TodoId::parse(&id)?;
    let Json(body) = body?;
    let changes = validate_update(&body)?;
    let todo = state.store.update(&session.user_id, id, changes).await?;
    Ok(ApiResponse::success(todo))
}

/// DELETE /api/todos/:id - remove an owned todo
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = TodoId::parse(&id)?;
    state.store.delete(&session.user_id, id).await?;
    Ok(ApiResponse::empty())
}
