//! Schoolfinder Service - HTTP microservice for registering schools and
//! listing them by proximity.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SCHOOLS_DATABASE_URL` | SQLite URL of the record store | `sqlite://schools.db` |
//! | `SCHOOLS_MAX_CONNECTIONS` | Connection pool size | 5 |
//! | `SCHOOLS_PORT` | HTTP server port | 3000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /addSchool` - Register a school
//! - `GET /listSchools?latitude=X&longitude=Y` - Schools sorted by distance
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use schoolfinder::SchoolServiceBuilder;
use schoolfinder_service::{router, AppState};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATABASE_URL: &str = "sqlite://schools.db";
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "schoolfinder_service=info,schoolfinder=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("SCHOOLS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    // The library reads SCHOOLS_DATABASE_URL and SCHOOLS_MAX_CONNECTIONS;
    // only an unset URL falls back to the default database
    let builder = SchoolServiceBuilder::from_env_or(DEFAULT_DATABASE_URL)?;

    let service = builder.build().await?;
    tracing::info!(
        schools = service.store().count().await?,
        port = port,
        "Connected to school store"
    );

    let state = Arc::new(AppState { service });
    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.service.close().await;
    tracing::info!("School store closed");

    Ok(())
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
