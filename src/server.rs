//! HTTP server initialization and runtime setup.
//!
//! Handles the store backend, database connections, the rating-service
//! client, and the Axum server lifecycle.

use crate::config::{Config, StoreBackend};
use crate::domain::gateways::RatingClient;
use crate::domain::repositories::MovieRepository;
use crate::infrastructure::memory::InMemoryMovieRepository;
use crate::infrastructure::persistence::PgMovieRepository;
use crate::infrastructure::rating::HttpRatingClient;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The movie store (PostgreSQL pool + migrations, or in-memory)
/// - Rating service HTTP client
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The rating client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository: Arc<dyn MovieRepository> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_database(&config).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Arc::new(PgMovieRepository::new(Arc::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory movie store; data is lost on restart");
            Arc::new(InMemoryMovieRepository::new())
        }
    };

    let rating_client: Arc<dyn RatingClient> = Arc::new(
        HttpRatingClient::new(
            config.rating_service_url.clone(),
            config.rating_service_timeout(),
        )
        .context("Failed to build rating service client")?,
    );

    let state = AppState::new(
        repository,
        rating_client,
        config.store_backend.as_str(),
        config.rating_update_max_retries,
    );

    let app = app_router(state, config.behind_proxy)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the connection pool, retrying with exponential backoff while the
/// database is still starting up.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres store backend")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.db_connect_retries.saturating_sub(1));

    let pool = Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = wait_for_signal("Ctrl+C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}

/// Resolves when `signal` fires. A handler that cannot be installed never
/// resolves, so it cannot trigger a shutdown by itself.
async fn wait_for_signal<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "Failed to install signal handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_signal_handler_never_resolves() {
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_signal("test", async { Err(std::io::Error::other("unsupported")) }),
        )
        .await;

        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_delivered_signal_resolves() {
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_signal("test", async { Ok(()) }),
        )
        .await;

        assert!(waited.is_ok());
    }
}
