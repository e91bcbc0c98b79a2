//! API module
//!
//! Contains the HTTP request handlers and the router wiring them together.

pub mod exercises;
pub mod extract;
pub mod middleware;
pub mod users;

use crate::config::AssetsConfig;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET /api/health - Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Exercise tracker is healthy".to_string(),
    })
}

/// Build the application router
///
/// `/` serves the landing page; unmatched paths fall through to the public directory.
pub fn router(state: AppState, assets: &AssetsConfig) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(assets.views_dir.join("index.html")))
        .route("/api/health", get(health_check))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id/exercises", post(exercises::add_exercise))
        .route("/api/users/:id/logs", get(exercises::get_log))
        .fallback_service(ServeDir::new(&assets.public_dir))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
