//! Backend de seguimiento de viajes de carga
//!
//! Autenticación por OTP, datos de referencia (camiones, ubicaciones,
//! molinos) y ciclo de vida de viajes con relevos de conductor.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Armar el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    // en producción solo los orígenes configurados; en desarrollo abierto
    let cors = if state.config.is_production() {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/user", routes::user_routes::create_user_router(state.clone()))
        .nest("/api/trip", routes::trip_routes::create_trip_router(state.clone()))
        .nest("/api/truck", routes::truck_routes::create_truck_router(state.clone()))
        .nest("/api/location", routes::location_routes::create_location_router(state.clone()))
        .nest("/api/mill", routes::mill_routes::create_mill_router(state.clone()))
        .nest("/api/admin", routes::admin_routes::create_admin_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "haul-tracking",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
