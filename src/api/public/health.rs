use axum::{http::StatusCode, response::Response, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::middleware::logging::to_response;

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Response {
    let now = Utc::now();
    debug!("Health endpoint accessed at {}", now);
    info!("Returning health status");

    to_response((StatusCode::OK, Json(HealthResponse::up(now.to_rfc3339()))), Ok(()))
}

#[derive(Serialize, Debug)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    message: &'static str,
}

impl HealthResponse {
    fn up(timestamp: String) -> HealthResponse {
        HealthResponse {
            status: "UP",
            timestamp,
            message: "E-commerce Store Backend is running",
        }
    }
}
