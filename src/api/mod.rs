//! API endpoints
//! 
//! Este módulo contiene los endpoints de la API.

pub mod auth;
pub mod drivers;
pub mod loads;
pub mod places;
pub mod routing;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::rate_limit::RateLimitState;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router(suggestion_limiter: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/places", places::create_places_router(suggestion_limiter))
        .nest("/api/route", routing::create_routing_router())
        .nest("/api/auth", auth::create_auth_router())
        .nest("/api/loads", loads::create_loads_router())
        .nest("/api/drivers", drivers::create_drivers_router())
}

/// Health check del servicio
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "freight-matching",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
