use crate::{health::HealthCheckResult, server::Server};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: HealthCheckResult,
}

pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/health", get(health_handler))
}

pub async fn health_handler(
    State(server): State<Server>,
) -> (StatusCode, Json<HealthResponse>) {
    let cache = server.cache.health_check().await;
    let (status_code, status) = if cache.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (status_code, Json(HealthResponse { status, cache }))
}
