use serde::Deserialize;

use super::Movie;

/// Catalog listing filters; every absent field matches everything
///
/// A numeric minimum never matches a movie whose value is unknown.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive exact genre name
    pub genre: Option<String>,
    pub min_rating: Option<f64>,
    pub min_popularity: Option<f64>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    /// Case-insensitive substring of the title, synopsis or any keyword
    pub keyword: Option<String>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
            if !movie.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
                return false;
            }
        }

        if let Some(min) = self.min_rating {
            if !movie.vote_average.is_some_and(|v| v >= min) {
                return false;
            }
        }

        if let Some(min) = self.min_popularity {
            if !movie.popularity.is_some_and(|p| p >= min) {
                return false;
            }
        }

        if self.year_from.is_some_and(|from| movie.year < from)
            || self.year_to.is_some_and(|to| movie.year > to)
        {
            return false;
        }

        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            let needle = keyword.to_lowercase();
            let found = movie.title.to_lowercase().contains(&needle)
                || movie.synopsis().to_lowercase().contains(&needle)
                || movie
                    .keywords
                    .iter()
                    .any(|k| k.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        true
    }
}
