use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub struct HealthController;

impl HealthController {
    /// GET /health — liveness probe.
    pub async fn health_check() -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok",
            message: "QuickShare API is running",
        })
    }
}
