use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Opaque todo identifier, assigned by the store on creation.
///
/// `parse` is the only way to obtain a `TodoId` from untrusted input, so a
/// malformed id is rejected before any query can be issued with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TodoId(Uuid);

#[derive(Debug, Error)]
#[error("invalid todo id: {0}")]
pub struct InvalidTodoId(pub String);

impl TodoId {
    pub fn new() -> Self {
        TodoId(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, InvalidTodoId> {
        Uuid::parse_str(s)
            .map(TodoId)
            .map_err(|_| InvalidTodoId(s.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One task owned by exactly one user.
///
/// `owner_id` always comes from the verified session, never from client
/// input, and every store operation filters on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized create payload produced by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
}

/// Normalized partial-update payload produced by the validator.
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}
