//! Application builder: wires stores, services, and the router together
//! and runs the HTTP server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tracing::{info, warn};

use taskhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use taskhub_cache::{CacheManager, EntityCache};
use taskhub_core::config::AppConfig;
use taskhub_core::error::AppError;
use taskhub_core::traits::clock::{Clock, SystemClock};
use taskhub_database::migration::run_migrations;
use taskhub_database::{DatabasePool, RecordStore};
use taskhub_entity::Record;
use taskhub_service::{
    CategoryPolicy, EntityService, RolePolicy, TaskPolicy, UserPolicy, UserService,
};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the application state on top of already-open pools and cache.
pub fn build_state(
    config: AppConfig,
    db: DatabasePool,
    cache: CacheManager,
    clock: Arc<dyn Clock>,
) -> AppState {
    fn store<E: Record>(db: &DatabasePool, cache: &CacheManager) -> RecordStore<E> {
        RecordStore::new(db.clone(), EntityCache::new(cache.clone()))
    }

    let user_service = UserService::new(
        EntityService::new(store(&db, &cache), UserPolicy, Arc::clone(&clock)),
        PasswordHasher::new(),
        JwtEncoder::new(&config.auth),
        Arc::clone(&clock),
    );

    AppState {
        jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
        user_service: Arc::new(user_service),
        task_service: Arc::new(EntityService::new(
            store(&db, &cache),
            TaskPolicy,
            Arc::clone(&clock),
        )),
        category_service: Arc::new(EntityService::new(
            store(&db, &cache),
            CategoryPolicy,
            Arc::clone(&clock),
        )),
        role_service: Arc::new(EntityService::new(store(&db, &cache), RolePolicy, clock)),
        config: Arc::new(config),
        db,
        cache,
    }
}

/// Connects the store and cache, then serves until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting TaskHub server...");

    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&db).await?;
    }

    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache).await?;

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config, db.clone(), cache, Arc::new(SystemClock));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "TaskHub server listening");

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    // In-flight requests get the grace period once the signal arrives.
    let drain_limit = async move {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = drain_limit => {
            warn!(grace_seconds = grace.as_secs(), "Connections still open after grace period");
        }
    }

    db.close().await;
    info!("TaskHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
