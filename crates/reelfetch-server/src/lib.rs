//! HTTP front end: the lookup routes behind an optional login gate.

pub mod auth;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

pub use session::{Authenticator, OpenAccess, SessionStore};
pub use state::AppState;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address {addr:?}: {source}")]
    InvalidBind {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let lookup_routes = Router::new()
        .route("/imdb/", get(routes::greeting).post(routes::lookup_form))
        .route("/imdb/:id", get(routes::lookup_by_id))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(lookup_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, bind: &str) -> Result<(), ServerError> {
    let addr: SocketAddr = bind.parse().map_err(|source| ServerError::InvalidBind {
        addr: bind.to_string(),
        source,
    })?;

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
