use serde::{Deserialize, Serialize};

use super::{Movie, MovieId};

/// One ranked recommendation: the movie, its relevance score and a reason
///
/// A score of `0.0` marks a non-personalized (cold start) pick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub score: f64,
    pub reason: String,
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub liked_ids: Vec<MovieId>,
    #[serde(default)]
    pub disliked_ids: Vec<MovieId>,
    #[serde(default)]
    pub k: Option<usize>,
}

/// Response body for the recommendations endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub liked_ids: Vec<MovieId>,
    pub recommendations: Vec<Recommendation>,
}
