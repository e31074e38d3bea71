//! In-process test doubles for the store and the session verifier.
//!
//! `MemoryTodoStore` mirrors the Postgres store's semantics (owner scoping,
//! unified NotFound, created_at DESC listing, unconditional updated_at
//! refresh) so router-level tests exercise the real handler/middleware
//! stack without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Utc;

use crate::auth::{Session, SessionVerifier, VerifierError};
use crate::database::store::{StoreError, TodoStore};
use crate::database::todo::{CreateTodo, Todo, TodoId, UpdateTodo};

#[derive(Default)]
pub struct MemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
    // Counts every store call so tests can assert "no query executed"
    ops: AtomicUsize,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far
    pub fn op_count(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    /// Direct snapshot of one record, bypassing ownership (test assertions only)
    pub fn get_raw(&self, id: TodoId) -> Option<Todo> {
        self.todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Todo>, StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let todos = self.todos.lock().unwrap();
        // Reverse insertion order first so a stable sort keeps later-created
        // records ahead on equal timestamps, matching created_at DESC
        let mut mine: Vec<Todo> = todos
            .iter()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn create(&self, owner_id: &str, payload: CreateTodo) -> Result<Todo, StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let todo = Todo {
            id: TodoId::new(),
            title: payload.title,
            description: payload.description,
            completed: false,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: TodoId,
        changes: UpdateTodo,
    ) -> Result<Todo, StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(description) = changes.description {
            todo.description = description;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete(&self, owner_id: &str, id: TodoId) -> Result<(), StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.owner_id == owner_id));
        if todos.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose database is unreachable; every call fails with an
/// infrastructure error, including the health probe
pub struct FailingTodoStore;

#[async_trait]
impl TodoStore for FailingTodoStore {
    async fn list(&self, _owner_id: &str) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn create(&self, _owner_id: &str, _payload: CreateTodo) -> Result<Todo, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn update(
        &self,
        _owner_id: &str,
        _id: TodoId,
        _changes: UpdateTodo,
    ) -> Result<Todo, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _owner_id: &str, _id: TodoId) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn health(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

/// Verifier backed by a fixed token -> principal table. The token is the
/// session cookie's value, same as the real cookie flow.
pub struct StaticVerifier {
    cookie_name: String,
    sessions: HashMap<String, Session>,
}

impl StaticVerifier {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            sessions: HashMap::new(),
        }
    }

    pub fn with_session(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        self.sessions.insert(
            token.into(),
            Session {
                user_id: user_id.clone(),
                email: Some(format!("{}@example.com", user_id)),
                name: Some(user_id),
            },
        );
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<Option<Session>, VerifierError> {
        let raw = match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(raw) => raw,
            None => return Ok(None),
        };
        for pair in raw.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(self.cookie_name.as_str()) {
                if let Some(token) = parts.next() {
                    return Ok(self.sessions.get(token).cloned());
                }
            }
        }
        Ok(None)
    }
}

/// Verifier whose backend is down; used to prove handlers fail closed
pub struct FailingVerifier;

#[async_trait]
impl SessionVerifier for FailingVerifier {
    async fn verify(&self, _headers: &HeaderMap) -> Result<Option<Session>, VerifierError> {
        Err(VerifierError::MalformedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_payload(title: &str) -> CreateTodo {
        CreateTodo { title: title.to_string(), description: String::new() }
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let store = MemoryTodoStore::new();
        store.create("alice", create_payload("first")).await.unwrap();
        store.create("bob", create_payload("not mine")).await.unwrap();
        store.create("alice", create_payload("second")).await.unwrap();
        store.create("alice", create_payload("third")).await.unwrap();

        let titles: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_refuses_non_owner_and_leaves_record_intact() {
        let store = MemoryTodoStore::new();
        let todo = store.create("alice", create_payload("mine")).await.unwrap();

        let changes = crate::validation::validate_update(&json!({"title": "stolen"})).unwrap();
        let err = store.update("bob", todo.id, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(store.get_raw(todo.id).unwrap().title, "mine");
    }

    #[tokio::test]
    async fn delete_is_not_idempotent_success() {
        let store = MemoryTodoStore::new();
        let todo = store.create("alice", create_payload("gone")).await.unwrap();

        store.delete("alice", todo.id).await.unwrap();
        for _ in 0..2 {
            let err = store.delete("alice", todo.id).await.unwrap_err();
            assert!(matches!(err, StoreError::NotFound));
        }
    }

    #[tokio::test]
    async fn empty_update_still_refreshes_updated_at() {
        let store = MemoryTodoStore::new();
        let todo = store.create("alice", create_payload("unchanged")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = store
            .update("alice", todo.id, UpdateTodo::default())
            .await
            .unwrap();

        assert!(updated.updated_at > todo.updated_at);
        assert_eq!(updated.title, todo.title);
        assert_eq!(updated.completed, todo.completed);
    }
}
