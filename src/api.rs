//! HTTP routes.
//!
//! ## Endpoints
//! - POST /gp/translations/update-check/0.1 - Update check
//! - GET  /health - Liveness probe

use crate::client::UPDATE_CHECK_PATH;
use crate::error::UpdateCheckError;
use crate::protocol::UpdateCandidate;
use crate::service::UpdateCheckService;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
pub fn create_router(service: Arc<UpdateCheckService>) -> Router {
    Router::new()
        .route(UPDATE_CHECK_PATH, post(update_check))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, service: Arc<UpdateCheckService>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("Failed to read listen address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// POST /gp/translations/update-check/0.1
///
/// The body is taken as raw bytes so that malformed JSON is reported as
/// `invalid_data` instead of the extractor's own rejection.
async fn update_check(
    State(service): State<Arc<UpdateCheckService>>,
    body: Bytes,
) -> Result<Json<Vec<UpdateCandidate>>, UpdateCheckError> {
    let updates = service.handle_body(&body).await?;
    Ok(Json(updates))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
