use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::services::Recommender;

pub mod movies;
pub mod recommendations;

/// Shared, read-only state for request handlers
pub struct AppState {
    pub recommender: Arc<Recommender>,
    /// Recommendation count when the request omits `k`
    pub default_k: usize,
    /// Requests asking for more are clamped to this
    pub max_k: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/:id", get(movies::get_movie))
        .route("/movies/:id/similar", get(movies::similar_movies))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
