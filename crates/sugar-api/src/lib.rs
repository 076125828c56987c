//! HTTP prediction service: `GET /health` and `POST /predict` over a model
//! loaded once at startup.

mod cors;
mod error;
mod model;
mod routes;
mod state;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

pub use cors::{ALLOWED_ORIGINS, cors_layer};
pub use error::{ApiError, MODEL_UNAVAILABLE_DETAIL, ServeError};
pub use model::{ModelState, UnloadedReason};
pub use routes::{HealthResponse, PredictRequest, PredictResponse};
pub use state::AppState;

/// Build the application router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ServeError::Bind`] | the address cannot be bound |
/// | [`ServeError::Serve`] | the accept loop fails |
#[instrument(skip(state))]
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ServeError> {
    let model_loaded = state.model().is_loaded();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServeError::Bind { addr, source: e })?;

    info!(%addr, model_loaded, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServeError::Serve { source: e })?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
