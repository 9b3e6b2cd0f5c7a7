use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use tracing_subscriber::EnvFilter;

use menu_api::config;
use menu_api::database::DatabaseManager;
use menu_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("menu_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Menu API in {:?} mode", config.environment);

    let state = match config.database.url {
        Some(_) => AppState::postgres(DatabaseManager::connect(&config.database).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, serving empty in-memory collections");
            AppState::in_memory()
        }
    };
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET not set, protected routes will reject every request");
    }
    let state = state
        .with_jwt_secret(config.security.jwt_secret.as_str())
        .with_max_limit(config.pagination.max_limit);

    let mut router = app(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if config.security.enable_cors {
        router = router.layer(menu_api::app::cors_layer(&config.security));
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Menu API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")
}
