//! Quire - a reusable sectioned blog application

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::{
    api::{self, AppState},
    config::Config,
    db,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quire=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quire...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    pool.ping().await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Site blog, seeded sections and services
    let state = AppState::build(pool, config.blog.clone()).await?;
    tracing::info!("Site blog {} ready", state.site_blog.id);

    // Optional bootstrap staff account
    if let (Ok(username), Ok(password)) = (
        std::env::var("QUIRE_ADMIN_USERNAME"),
        std::env::var("QUIRE_ADMIN_PASSWORD"),
    ) {
        let user = state
            .user_service
            .ensure_staff_user(&username, &password)
            .await?;
        tracing::info!("Staff account '{}' ready", user.username);
    } else if !state.user_service.has_users().await? {
        tracing::warn!(
            "No accounts exist; set QUIRE_ADMIN_USERNAME and QUIRE_ADMIN_PASSWORD to create one"
        );
    }

    let removed = state.user_service.cleanup_expired_sessions().await?;
    if removed > 0 {
        tracing::info!("Removed {} expired session(s)", removed);
    }

    // Build router
    let pool = state.pool.clone();
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
