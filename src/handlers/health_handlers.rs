//! Health handler.
//!
//! `GET /health` -> liveness probe for the load balancer. Always 200 while
//! the process is up; never performs store I/O.

use axum::{Json, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
