//! Liveness handler.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /healthz` — status and crate version.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: percale_core::version(),
    })
}
