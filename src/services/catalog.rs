use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::models::{Movie, MovieFilter, MovieId};

/// Error types for building the catalog and its index
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog is empty: cannot derive a vocabulary")]
    EmptyCatalog,
    #[error("Catalog documents contain no terms: cannot derive a vocabulary")]
    EmptyVocabulary,
    #[error("Duplicate movie id in catalog: {0}")]
    DuplicateId(MovieId),
    #[error("Movie {0} not in catalog")]
    UnknownMovie(MovieId),
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, ordered movie catalog with an id -> position map
///
/// Positions are the row indices used by the vector space model.
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
    positions: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Builds the catalog, rejecting empty input and duplicate ids
    pub fn new(movies: Vec<Movie>) -> Result<Self, CatalogError> {
        if movies.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut positions = HashMap::with_capacity(movies.len());
        for (pos, movie) in movies.iter().enumerate() {
            if positions.insert(movie.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(movie.id));
            }
        }

        Ok(Self { movies, positions })
    }

    /// Loads a JSON array of movie records and normalizes each one
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let movies: Vec<Movie> = serde_json::from_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            movies = movies.len(),
            "Loaded catalog file"
        );

        Self::new(movies.into_iter().map(Movie::normalize).collect())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movie at a catalog position
    pub fn at(&self, pos: usize) -> &Movie {
        &self.movies[pos]
    }

    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.position(id).map(|pos| &self.movies[pos])
    }

    /// Movies matching every filter criterion, in catalog order
    pub fn filter(&self, filter: &MovieFilter) -> Vec<&Movie> {
        self.movies.iter().filter(|m| filter.matches(m)).collect()
    }

    /// Resolves ids to positions, silently dropping unknown ids
    ///
    /// Order and duplicates of the input are preserved.
    pub fn resolve(&self, ids: &[MovieId]) -> Vec<usize> {
        ids.iter().filter_map(|id| self.position(*id)).collect()
    }
}
