mod filter;
mod movie;
mod recommendation;

pub use filter::MovieFilter;
pub use movie::{decade_label, popularity_tier, Collection, Movie, MovieId, UNKNOWN_DIRECTOR};
pub use recommendation::{Recommendation, RecommendationRequest, RecommendationResponse};
