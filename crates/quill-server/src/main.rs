use anyhow::{Context, Result};
use quill_common::models::user::Role;
use quill_db::{create_pool, run_migrations, UserRepo};
use quill_server::auth::hash_password;
use quill_server::config::load_config;
use quill_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Quill server");

    // Load configuration
    let config_path =
        std::env::var("QUILL_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Seed initial admin if configured
    if let Some(admin) = &config.auth.initial_admin {
        match UserRepo::get_by_username(&pool, &admin.username).await {
            Ok(Some(_)) => {
                tracing::info!(
                    "Initial admin '{}' already exists, skipping seed",
                    admin.username
                );
            }
            Ok(None) => {
                let password_hash = hash_password(&admin.password)
                    .context("Failed to hash initial admin password")?;
                UserRepo::create(
                    &pool,
                    uuid::Uuid::new_v4(),
                    &admin.username,
                    &admin.email,
                    &password_hash,
                    Role::Admin,
                )
                .await
                .context("Failed to create initial admin")?;
                tracing::info!("Created initial admin: {}", admin.username);
            }
            Err(e) => {
                tracing::warn!("Failed to check for initial admin: {}", e);
            }
        }
    }

    // Build application state and router
    let state = AppState::new(pool, config.clone());
    let app = quill_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    tracing::info!("Server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
