use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::todo::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Errors from the todo store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matched (id, owner). Covers both "doesn't exist" and
    /// "exists but belongs to someone else" - callers must not be able to
    /// tell the difference.
    #[error("todo not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Owner-scoped CRUD over the todos collection.
///
/// Every operation takes the verified caller's id as a mandatory filter;
/// there is no way to reach another user's record through this trait.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos for one owner, newest first
    async fn list(&self, owner_id: &str) -> Result<Vec<Todo>, StoreError>;

    /// Persist a new todo and return the stored record
    async fn create(&self, owner_id: &str, payload: CreateTodo) -> Result<Todo, StoreError>;

    /// Apply provided fields to the record matching (id, owner) and refresh
    /// `updated_at`, atomically. An all-`None` payload still refreshes the
    /// timestamp.
    async fn update(
        &self,
        owner_id: &str,
        id: TodoId,
        changes: UpdateTodo,
    ) -> Result<Todo, StoreError>;

    /// Remove the record matching (id, owner)
    async fn delete(&self, owner_id: &str, id: TodoId) -> Result<(), StoreError>;

    /// Liveness probe for the backing store
    async fn health(&self) -> Result<(), StoreError>;
}

const TODO_COLUMNS: &str = "id, title, description, completed, owner_id, created_at, updated_at";

/// Postgres-backed store over an injected pool
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Todo>, StoreError> {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn create(&self, owner_id: &str, payload: CreateTodo) -> Result<Todo, StoreError> {
        // Single now() so created_at == updated_at on a fresh record
        let sql = format!(
            "INSERT INTO todos (id, title, description, completed, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, FALSE, $4, now(), now()) \
             RETURNING {TODO_COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(TodoId::new())
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: TodoId,
        changes: UpdateTodo,
    ) -> Result<Todo, StoreError> {
        // Match-then-set as one statement: concurrent updates race here and
        // resolve last-write-wins without lost-update corruption.
        let sql = format!(
            "UPDATE todos SET \
               title = COALESCE($3, title), \
               description = COALESCE($4, description), \
               completed = COALESCE($5, completed), \
               updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {TODO_COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.completed)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, owner_id: &str, id: TodoId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
