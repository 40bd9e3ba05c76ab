//! HTTP adapter for the Rentwise core.
//!
//! # Responsibility
//! - Translate `/api` CRUD requests into core service calls.
//! - Map core errors onto status codes with `{"message": ...}` bodies.
//! - Own process concerns: configuration, CORS, graceful shutdown.

use axum::http::HeaderValue;
use axum::Router;
use log::{error, info};
use rentwise_core::{open_db, DbError};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use routes::router;
pub use state::AppState;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to open database: {0}")]
    Database(#[from] DbError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(std::io::Error),
}

/// Opens the configured database and serves the API until a shutdown signal.
pub async fn run(config: Config) -> Result<(), ServerError> {
    info!(
        "event=server_init module=server status=start db_path={}",
        config.db_path.display()
    );
    let conn = open_db(&config.db_path)?;
    let app = with_cors(router(AppState::new(conn)), config.cors_origin.clone());

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;
    info!("event=server_start module=server status=ok address={address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

/// Allows any origin unless one is configured.
fn with_cors(app: Router, origin: Option<HeaderValue>) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let cors = match origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    };
    app.layer(cors)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=server status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=server status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=server status=ok signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown_signal module=server status=error signal=terminate error={err}");
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
}
