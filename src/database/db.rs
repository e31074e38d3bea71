use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the single process-wide pool. Constructed once in `main`, injected
/// into `AppState`, closed on shutdown - never reached through a global.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await?;

    info!("created database pool (max_connections={})", config.max_connections);
    Ok(pool)
}

/// Create the todos table and its listing index if they don't exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            owner_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    // Listing is always per-owner, newest first
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS todos_owner_created_idx \
         ON todos (owner_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
