use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::Movie;

use super::catalog::Catalog;
use super::vector_space::VectorSpaceModel;

/// Multiplier applied to the similarity of disliked movies
pub const DISLIKE_DAMPENING: f64 = 0.1;

// Popularity boost: 1 + ln(1 + popularity) / scale
pub const POPULARITY_SCALE: f64 = 40.0;

// Quality boost, only applied above the vote threshold
pub const MIN_VOTES_FOR_QUALITY: u32 = 50;
pub const RATING_THRESHOLD_EXCELLENT: f64 = 8.0;
pub const RATING_THRESHOLD_VERY_GOOD: f64 = 7.5;
pub const RATING_THRESHOLD_GOOD: f64 = 7.0;
pub const RATING_THRESHOLD_DECENT: f64 = 6.5;
pub const RATING_THRESHOLD_POOR: f64 = 5.0;
pub const BOOST_RATING_EXCELLENT: f64 = 1.30;
pub const BOOST_RATING_VERY_GOOD: f64 = 1.20;
pub const BOOST_RATING_GOOD: f64 = 1.15;
pub const BOOST_RATING_DECENT: f64 = 1.10;
pub const PENALTY_RATING_POOR: f64 = 0.80;

// Recency boost by age relative to the reference year
pub const AGE_RECENT: i32 = 3;
pub const AGE_MODERN: i32 = 10;
pub const AGE_CLASSIC: i32 = 40;
pub const BOOST_RECENT_MOVIES: f64 = 1.05;
pub const BOOST_MODERN_MOVIES: f64 = 1.02;
pub const BOOST_CLASSICS: f64 = 1.01;

/// Boost for any movie that belongs to a collection
pub const BOOST_COLLECTION: f64 = 1.1;

/// A catalog position with its relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub pos: usize,
    pub score: f64,
}

/// Log-scaled popularity boost; neutral when popularity is unknown
pub fn popularity_boost(movie: &Movie) -> f64 {
    match movie.popularity {
        Some(popularity) => 1.0 + popularity.max(0.0).ln_1p() / POPULARITY_SCALE,
        None => 1.0,
    }
}

/// Rating-tier boost for movies with enough votes
///
/// Ratings in [5.0, 6.5) stay neutral.
pub fn quality_boost(movie: &Movie) -> f64 {
    let (Some(rating), Some(votes)) = (movie.vote_average, movie.vote_count) else {
        return 1.0;
    };
    if votes <= MIN_VOTES_FOR_QUALITY {
        return 1.0;
    }

    if rating >= RATING_THRESHOLD_EXCELLENT {
        BOOST_RATING_EXCELLENT
    } else if rating >= RATING_THRESHOLD_VERY_GOOD {
        BOOST_RATING_VERY_GOOD
    } else if rating >= RATING_THRESHOLD_GOOD {
        BOOST_RATING_GOOD
    } else if rating >= RATING_THRESHOLD_DECENT {
        BOOST_RATING_DECENT
    } else if rating < RATING_THRESHOLD_POOR {
        PENALTY_RATING_POOR
    } else {
        1.0
    }
}

/// Age-based boost relative to a fixed reference year
pub fn recency_boost(movie: &Movie, reference_year: i32) -> f64 {
    let age = reference_year.saturating_sub(movie.year);
    if age <= AGE_RECENT {
        BOOST_RECENT_MOVIES
    } else if age <= AGE_MODERN {
        BOOST_MODERN_MOVIES
    } else if age > AGE_CLASSIC {
        BOOST_CLASSICS
    } else {
        1.0
    }
}

pub fn collection_boost(movie: &Movie) -> f64 {
    if movie.belongs_to_collection.is_some() {
        BOOST_COLLECTION
    } else {
        1.0
    }
}

/// Product of all per-movie boosts
pub fn combined_boost(movie: &Movie, reference_year: i32) -> f64 {
    popularity_boost(movie)
        * quality_boost(movie)
        * recency_boost(movie, reference_year)
        * collection_boost(movie)
}

/// Computes base similarity and boosted relevance for a request
pub struct ScoringEngine<'a> {
    catalog: &'a Catalog,
    model: &'a VectorSpaceModel,
    reference_year: i32,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(catalog: &'a Catalog, model: &'a VectorSpaceModel, reference_year: i32) -> Self {
        Self {
            catalog,
            model,
            reference_year,
        }
    }

    /// Non-personalized ordering of eligible positions
    ///
    /// Sorted by popularity, then rating, then year, all descending. Unknown
    /// values sort after known ones; full ties keep catalog order.
    pub fn cold_start(&self, excluded: &HashSet<usize>) -> Vec<usize> {
        let mut eligible: Vec<usize> = (0..self.catalog.len())
            .filter(|pos| !excluded.contains(pos))
            .collect();

        eligible.sort_by(|&a, &b| {
            let (a, b) = (self.catalog.at(a), self.catalog.at(b));
            desc_known_first(a.popularity, b.popularity)
                .then_with(|| desc_known_first(a.vote_average, b.vote_average))
                .then_with(|| b.year.cmp(&a.year))
        });

        eligible
    }

    /// Personalized ranking of eligible positions by adjusted similarity
    ///
    /// Returns an empty list when no liked position is valid.
    pub fn rank(
        &self,
        liked: &[usize],
        disliked: &[usize],
        excluded: &HashSet<usize>,
    ) -> Vec<ScoredMovie> {
        let Some(mut sims) = self.model.mean_profile_similarities(liked) else {
            return Vec::new();
        };

        // No-op on the output: disliked positions are excluded below.
        for &pos in disliked {
            if let Some(sim) = sims.get_mut(pos) {
                *sim *= DISLIKE_DAMPENING;
            }
        }

        for (pos, sim) in sims.iter_mut().enumerate() {
            *sim *= combined_boost(self.catalog.at(pos), self.reference_year);
        }

        let mut ranked: Vec<ScoredMovie> = sims
            .into_iter()
            .enumerate()
            .filter(|(pos, _)| !excluded.contains(pos))
            .map(|(pos, score)| ScoredMovie { pos, score })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }
}

/// Descending order on optional values with unknown values last
fn desc_known_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
