use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieFilter, MovieId, Recommendation},
    routes::AppState,
    services::CatalogError,
};

/// Neighbours returned by the similar-movies endpoint when `limit` is omitted
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub limit: Option<usize>,
}

/// Handler for the filtered catalog listing
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MovieFilter>,
) -> Json<Vec<Movie>> {
    let movies: Vec<Movie> = state
        .recommender
        .catalog()
        .filter(&filter)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(matched = movies.len(), "Catalog listing filtered");

    Json(movies)
}

/// Handler for catalog lookup by id
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .recommender
        .catalog()
        .get(id)
        .cloned()
        .ok_or(CatalogError::UnknownMovie(id))?;
    Ok(Json(movie))
}

/// Handler for item-to-item similar movies
pub async fn similar_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MovieId>,
    Query(params): Query<SimilarParams>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let limit = match params.limit {
        Some(0) => {
            return Err(AppError::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }
        Some(limit) => limit.min(state.max_k),
        None => DEFAULT_SIMILAR_LIMIT.min(state.max_k),
    };

    let recommender = state.recommender.clone();
    let similar = tokio::task::spawn_blocking(move || recommender.similar(id, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(similar))
}
