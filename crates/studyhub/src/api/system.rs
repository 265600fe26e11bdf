//! System endpoints

use std::sync::Arc;

use axum::{Json, extract::State};
use studyhub_api::responses::HealthResponse;
use tracing::warn;

use crate::api::error::AppError;
use crate::state::AppState;

/// Health check endpoint
///
/// # Errors
/// Returns 503 when the database cannot be reached
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    if let Err(e) = state.store.ping().await {
        warn!(error = %e, "health check failed");
        return Err(AppError::service_unavailable("database unavailable"));
    }

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
