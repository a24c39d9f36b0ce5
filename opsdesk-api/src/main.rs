//! # OpsDesk API Server
//!
//! HTTP API server for OpsDesk, a small operations back office:
//! a customer directory, a task board, and a role-based user
//! directory behind JWT authentication.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opsdesk-api
//! ```
//!
//! Requires `DATABASE_URL` and `JWT_SECRET` in the environment (or a
//! `.env` file). Migrations run automatically at startup.

use opsdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use opsdesk_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "opsdesk_api=debug,opsdesk_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OpsDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Create the database if it doesn't exist yet, then connect
    migrations::ensure_database_exists(&config.database.url).await?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    // Apply pending migrations
    migrations::run_migrations(&db).await?;

    let status = migrations::get_migration_status(&db).await?;
    tracing::info!(
        applied = status.applied_migrations,
        latest = ?status.latest_version,
        "Database migrations up to date"
    );

    // Build application
    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the pool so in-flight queries finish cleanly
    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
