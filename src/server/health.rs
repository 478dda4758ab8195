//! Liveness check endpoint.

use actix_web::{HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: String,
}

/// `GET /health` — reports that the process is up. Touches no shared state.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "Server is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}
