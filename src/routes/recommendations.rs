use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let k = match request.k {
        Some(0) => {
            return Err(AppError::InvalidInput(
                "k must be a positive integer".to_string(),
            ));
        }
        Some(k) => k.min(state.max_k),
        None => state.default_k,
    };

    tracing::info!(
        request_id = %request_id,
        liked_count = request.liked_ids.len(),
        disliked_count = request.disliked_ids.len(),
        k,
        "Processing recommendation request"
    );

    // Ranking is CPU-bound; keep it off the async workers
    let recommender = state.recommender.clone();
    let liked_ids = request.liked_ids.clone();
    let disliked_ids = request.disliked_ids;
    let recommendations = tokio::task::spawn_blocking(move || {
        recommender.recommend(&liked_ids, &disliked_ids, k)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        liked_ids: request.liked_ids,
        recommendations,
    }))
}
