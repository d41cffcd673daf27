//! Liveness and readiness handlers

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use qrdrop_core::constants::MSG_SERVER_RUNNING;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const STORAGE_PROBE_KEY: &str = "health-check-non-existent-key";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub storage_backend: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub storage: String,
}

/// Plain-text liveness indicator
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Server is up", body = String, content_type = "text/plain"))
)]
pub async fn root() -> &'static str {
    MSG_SERVER_RUNNING
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is running", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_backend: state.storage.backend_type().to_string(),
    })
}

/// Readiness probe - storage must answer a lookup within the timeout.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Storage reachable", body = ReadinessResponse),
        (status = 503, description = "Storage unreachable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = match tokio::time::timeout(
        STORAGE_CHECK_TIMEOUT,
        state.storage.exists(STORAGE_PROBE_KEY),
    )
    .await
    {
        Ok(Ok(_)) => "ready".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            format!("not_ready: {}", e)
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            "timeout".to_string()
        }
    };

    let ready = storage == "ready";
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            storage,
        }),
    )
}
