//! La Grande Mosaïque voting server entry point.

use std::sync::Arc;

use axum::Router;
use mosaique_api::{AppState, router as api_router};
use mosaique_common::Config;
use mosaique_core::{DatabaseCategoryRegistry, DatabaseTallyStore};
use mosaique_db::repositories::{CategoryRepository, NomineeRepository, VoteEventRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mosaique=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting mosaique server...");

    // Load configuration
    let config = Config::load()?;
    let storage_timeout = config.voting.storage_timeout();

    // Connect to database
    let db = Arc::new(mosaique_db::init(&config).await?);
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    mosaique_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let nominee_repo = NomineeRepository::new(Arc::clone(&db));
    let vote_event_repo = VoteEventRepository::new(Arc::clone(&db));

    // Initialize stores and services
    let categories = Arc::new(DatabaseCategoryRegistry::new(
        category_repo,
        nominee_repo.clone(),
        storage_timeout,
    ));
    let tallies = Arc::new(DatabaseTallyStore::new(
        vote_event_repo,
        nominee_repo,
        storage_timeout,
    ));
    let state = AppState::new(categories, tallies);

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        storage_timeout_ms = config.voting.storage_timeout_ms,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
