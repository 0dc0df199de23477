//! API endpoints
//!
//! Este módulo contiene los endpoints de la API.

pub mod scooters;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_endpoint))
        .merge(scooters::create_scooter_router())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "scooter-gateway",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
