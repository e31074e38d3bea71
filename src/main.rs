use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use todo_api_rust::auth::HttpSessionVerifier;
use todo_api_rust::config::AppConfig;
use todo_api_rust::database::{db, store::PgTodoStore};
use todo_api_rust::{app_with_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_BASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("starting todo API in {:?} mode", config.environment);

    // Pool lifecycle: opened here, injected via AppState, closed on shutdown
    let pool = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    db::ensure_schema(&pool)
        .await
        .context("failed to ensure database schema")?;

    let verifier = HttpSessionVerifier::new(&config.auth).context("failed to build session verifier")?;

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(PgTodoStore::new(pool.clone())),
        verifier: Arc::new(verifier),
    };

    let app = app_with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("todo API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("database pool closed, shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
