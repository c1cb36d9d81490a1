use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;

use tracing::instrument;

use crate::models::{MovieId, Recommendation};

use super::catalog::{Catalog, CatalogError};
use super::diversity::DiversityReranker;
use super::explanation::{cold_start_reason, Explainer};
use super::features::synthesize;
use super::scoring::ScoringEngine;
use super::vector_space::VectorSpaceModel;

/// Year that movie ages are measured against unless configured otherwise
pub const DEFAULT_REFERENCE_YEAR: i32 = 2026;

/// Tuning for the recommender that is not derived from the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    /// Reference year for the recency boost; never read from the clock
    pub reference_year: i32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

/// Content-based movie recommender
///
/// Owns the catalog and the vector space built from it. Both are frozen after
/// construction, so a single instance can serve concurrent requests through a
/// shared reference without locking. A catalog change means building a new
/// instance.
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    model: VectorSpaceModel,
    config: RecommenderConfig,
}

impl Recommender {
    /// Synthesizes every movie's document and builds the vector space
    pub fn new(catalog: Catalog, config: RecommenderConfig) -> Result<Self, CatalogError> {
        let start = Instant::now();

        let documents: Vec<String> = catalog.movies().iter().map(synthesize).collect();
        let model = VectorSpaceModel::build(&documents)?;

        tracing::info!(
            movies = catalog.len(),
            vocabulary = model.vocabulary_size(),
            elapsed_ms = start.elapsed().as_millis(),
            "Recommender index built"
        );

        Ok(Self {
            catalog,
            model,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> RecommenderConfig {
        self.config
    }

    /// Ranks up to `k` movies for a user's liked and disliked movies
    ///
    /// Liked and disliked movies never appear in the output. Unknown ids are
    /// ignored. With no liked ids at all the result is a popularity ranking
    /// with score `0.0`; with liked ids that are all unknown it is empty.
    #[instrument(skip_all, fields(liked = liked_ids.len(), disliked = disliked_ids.len(), k))]
    pub fn recommend(
        &self,
        liked_ids: &[MovieId],
        disliked_ids: &[MovieId],
        k: usize,
    ) -> Vec<Recommendation> {
        if k == 0 {
            return Vec::new();
        }

        let liked = self.catalog.resolve(liked_ids);
        let disliked = self.catalog.resolve(disliked_ids);
        let excluded: HashSet<usize> = liked.iter().chain(disliked.iter()).copied().collect();

        let engine = ScoringEngine::new(&self.catalog, &self.model, self.config.reference_year);

        if liked_ids.is_empty() {
            tracing::debug!("No liked movies, using cold start ranking");
            return engine
                .cold_start(&excluded)
                .into_iter()
                .take(k)
                .map(|pos| {
                    let movie = self.catalog.at(pos);
                    Recommendation {
                        movie: movie.clone(),
                        score: 0.0,
                        reason: cold_start_reason(movie),
                    }
                })
                .collect();
        }

        if liked.is_empty() {
            tracing::debug!("No liked movie is in the catalog, cannot personalize");
            return Vec::new();
        }

        let ranked = engine.rank(&liked, &disliked, &excluded);
        let picks = DiversityReranker::new(&self.catalog, &liked).rerank(&ranked, k);
        let explainer = Explainer::new(&self.catalog, &self.model);

        tracing::debug!(
            candidates = ranked.len(),
            returned = picks.len(),
            "Personalized recommendations ranked"
        );

        picks
            .into_iter()
            .map(|pick| Recommendation {
                movie: self.catalog.at(pick.pos).clone(),
                score: pick.score,
                reason: explainer.explain(pick.pos, &liked),
            })
            .collect()
    }

    /// Up to `limit` movies closest to `id` by content similarity alone
    ///
    /// No boosts or diversity pass apply. Movies with no shared terms are
    /// left out. Each reason is anchored on the source movie.
    #[instrument(skip(self))]
    pub fn similar(&self, id: MovieId, limit: usize) -> Result<Vec<Recommendation>, CatalogError> {
        let pos = self
            .catalog
            .position(id)
            .ok_or(CatalogError::UnknownMovie(id))?;

        let others: Vec<usize> = (0..self.catalog.len()).filter(|&p| p != pos).collect();
        let mut neighbours: Vec<(usize, f64)> = self
            .model
            .pairwise(pos, &others)
            .into_iter()
            .filter(|(_, sim)| *sim > 0.0)
            .collect();
        neighbours.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        neighbours.truncate(limit);

        let explainer = Explainer::new(&self.catalog, &self.model);
        Ok(neighbours
            .into_iter()
            .map(|(other, sim)| Recommendation {
                movie: self.catalog.at(other).clone(),
                score: sim,
                reason: explainer.explain(other, &[pos]),
            })
            .collect())
    }
}
