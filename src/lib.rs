//! Groomery pricing and scheduling engine.
//!
//! An Axum/JSON service for the Groomery pet-grooming marketplace covering
//! three cooperating pieces: the pricing catalog providers configure, the
//! availability engine that decides whether a slot is bookable, and the
//! booking lifecycle that owner and provider drive together. Page rendering,
//! authentication, and file uploads live in other services; this one owns
//! the rules.

pub mod availability;
pub mod booking;
pub mod cache;
pub mod catalog;
pub mod db;
pub mod error;
pub mod models;

use axum::{extract::State, routing::get, Json, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use cache::AppCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/catalog", catalog::router())
        .nest("/availability", availability::router())
        .nest("/bookings", booking::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Liveness probe with cache statistics
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "cache": state.cache.stats(),
    }))
}
