use axum::{Json, response::IntoResponse};

use viewtube_types::api::{ApiResponse, HealthcheckResponse};

/// GET /healthcheck — no auth.
pub async fn healthcheck() -> impl IntoResponse {
    Json(ApiResponse::new(
        200,
        HealthcheckResponse {
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
        "Server is healthy and running.",
    ))
}
