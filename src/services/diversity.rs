use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::Movie;

use super::catalog::Catalog;
use super::scoring::ScoredMovie;

/// Only the first `k * SCAN_FACTOR` ranked movies are considered
pub const SCAN_FACTOR: usize = 3;

// Attribute slices recorded as "seen"
pub const SEEN_COMPANIES_PER_MOVIE: usize = 2;
pub const SEEN_KEYWORDS_PER_MOVIE: usize = 5;

// Diversity multipliers
pub const DIVERSITY_BOOST_NEW_DIRECTOR: f64 = 1.2;
pub const DIVERSITY_BOOST_NEW_COMPANY: f64 = 1.15;
pub const DIVERSITY_BOOST_SOME_OVERLAP: f64 = 1.05;
pub const DIVERSITY_BOOST_NEW_KEYWORDS: f64 = 1.1;
pub const DIVERSITY_PENALTY_KEYWORD_OVERLAP: f64 = 0.85;
pub const DIVERSITY_BOOST_NEW_DECADE: f64 = 1.08;
pub const KEYWORD_OVERLAP_LOW: f64 = 0.3;
pub const KEYWORD_OVERLAP_HIGH: f64 = 0.7;

// Genre repetition penalties
pub const GENRE_PENALTY_HIGH_OVERLAP: f64 = 0.8;
pub const GENRE_PENALTY_MEDIUM_OVERLAP: f64 = 0.9;
pub const GENRE_PENALTY_LOW_OVERLAP: f64 = 0.95;

/// Boost for movies sharing a collection with a liked movie
pub const BOOST_SAME_FRANCHISE: f64 = 1.3;

/// Attributes already represented among the scanned movies
///
/// Sets only grow during a pass.
#[derive(Debug, Default)]
struct SeenAttributes<'m> {
    directors: HashSet<&'m str>,
    companies: HashSet<&'m str>,
    keywords: HashSet<&'m str>,
    decades: HashSet<&'m str>,
    genres: HashSet<&'m str>,
}

impl<'m> SeenAttributes<'m> {
    fn diversity_multiplier(&self, movie: &Movie) -> f64 {
        let mut multiplier = 1.0;

        // "Unknown" is a director value here; only an empty one is skipped
        if !movie.director.is_empty() && !self.directors.contains(movie.director.as_str()) {
            multiplier *= DIVERSITY_BOOST_NEW_DIRECTOR;
        }

        if !movie.production_companies.is_empty() {
            let overlap: HashSet<&str> = movie
                .production_companies
                .iter()
                .map(String::as_str)
                .filter(|c| self.companies.contains(*c))
                .collect();
            if overlap.is_empty() {
                multiplier *= DIVERSITY_BOOST_NEW_COMPANY;
            } else if (overlap.len() as f64) < self.companies.len() as f64 / 2.0 {
                multiplier *= DIVERSITY_BOOST_SOME_OVERLAP;
            }
        }

        if !movie.keywords.is_empty() {
            let head = &movie.keywords[..movie.keywords.len().min(SEEN_KEYWORDS_PER_MOVIE)];
            let overlap: HashSet<&str> = head
                .iter()
                .map(String::as_str)
                .filter(|k| self.keywords.contains(*k))
                .collect();
            let ratio = overlap.len() as f64 / head.len() as f64;
            if ratio < KEYWORD_OVERLAP_LOW {
                multiplier *= DIVERSITY_BOOST_NEW_KEYWORDS;
            } else if ratio > KEYWORD_OVERLAP_HIGH {
                multiplier *= DIVERSITY_PENALTY_KEYWORD_OVERLAP;
            }
        }

        if let Some(decade) = movie.decade.as_deref() {
            if !self.decades.contains(decade) {
                multiplier *= DIVERSITY_BOOST_NEW_DECADE;
            }
        }

        multiplier
    }

    fn genre_penalty(&self, movie: &Movie) -> f64 {
        let shared: HashSet<&str> = movie
            .genres
            .iter()
            .map(String::as_str)
            .filter(|g| self.genres.contains(*g))
            .collect();
        match shared.len() {
            0 => 1.0,
            1 => GENRE_PENALTY_LOW_OVERLAP,
            2 => GENRE_PENALTY_MEDIUM_OVERLAP,
            _ => GENRE_PENALTY_HIGH_OVERLAP,
        }
    }

    fn record(&mut self, movie: &'m Movie) {
        if !movie.director.is_empty() {
            self.directors.insert(&movie.director);
        }
        self.companies.extend(
            movie
                .production_companies
                .iter()
                .take(SEEN_COMPANIES_PER_MOVIE)
                .map(String::as_str),
        );
        self.keywords.extend(
            movie
                .keywords
                .iter()
                .take(SEEN_KEYWORDS_PER_MOVIE)
                .map(String::as_str),
        );
        if let Some(decade) = movie.decade.as_deref() {
            self.decades.insert(decade);
        }
        self.genres.extend(movie.genres.iter().map(String::as_str));
    }
}

/// Re-ranks a relevance-ordered list to spread directors, studios, themes,
/// eras and genres across the top results
pub struct DiversityReranker<'a> {
    catalog: &'a Catalog,
    liked_collections: HashSet<u64>,
}

impl<'a> DiversityReranker<'a> {
    /// `liked` are the resolved catalog positions of the liked movies
    pub fn new(catalog: &'a Catalog, liked: &[usize]) -> Self {
        let liked_collections = liked
            .iter()
            .filter_map(|&pos| catalog.at(pos).collection_id())
            .collect();
        Self {
            catalog,
            liked_collections,
        }
    }

    pub fn franchise_boost(&self, movie: &Movie) -> f64 {
        match movie.collection_id() {
            Some(id) if self.liked_collections.contains(&id) => BOOST_SAME_FRANCHISE,
            _ => 1.0,
        }
    }

    /// Scans the first `3 * k` ranked movies and returns the top `k`
    ///
    /// Output is ordered by diversity-adjusted score but each entry keeps its
    /// incoming score.
    pub fn rerank(&self, ranked: &[ScoredMovie], k: usize) -> Vec<ScoredMovie> {
        let mut seen = SeenAttributes::default();
        let window = k.saturating_mul(SCAN_FACTOR).min(ranked.len());
        let mut adjusted: Vec<(ScoredMovie, f64)> = Vec::with_capacity(window);

        for scored in &ranked[..window] {
            let movie = self.catalog.at(scored.pos);
            let multiplier = seen.diversity_multiplier(movie)
                * seen.genre_penalty(movie)
                * self.franchise_boost(movie);

            adjusted.push((*scored, scored.score * multiplier));
            seen.record(movie);
        }

        tracing::trace!(scanned = adjusted.len(), k, "Diversity re-ranking window scanned");

        adjusted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        adjusted.truncate(k);

        adjusted.into_iter().map(|(scored, _)| scored).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;

    fn movie(id: u64, director: &str, genres: &[&str]) -> Movie {
        let mut movie = Movie::new(id, format!("Movie {}", id), 2000);
        movie.director = director.to_string();
        movie.genres = genres.iter().map(|g| g.to_string()).collect();
        movie
    }

    fn scored(pos: usize, score: f64) -> ScoredMovie {
        ScoredMovie { pos, score }
    }

    #[test]
    fn test_new_director_preferred_over_seen_director() {
        let catalog = Catalog::new(vec![
            movie(1, "Kubrick", &[]),
            movie(2, "Kubrick", &[]),
            movie(3, "Lynch", &[]),
        ])
        .unwrap();
        let reranker = DiversityReranker::new(&catalog, &[]);

        let ranked = vec![scored(0, 1.0), scored(1, 0.5), scored(2, 0.5)];
        let out = reranker.rerank(&ranked, 3);

        let order: Vec<usize> = out.iter().map(|s| s.pos).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_original_scores_are_kept() {
        let catalog = Catalog::new(vec![movie(1, "A", &[]), movie(2, "B", &[])]).unwrap();
        let reranker = DiversityReranker::new(&catalog, &[]);

        let out = reranker.rerank(&[scored(0, 0.9), scored(1, 0.4)], 2);
        assert_eq!(out, vec![scored(0, 0.9), scored(1, 0.4)]);
    }

    #[test]
    fn test_scan_window_is_three_times_k() {
        let mut movies: Vec<Movie> = (1..=9).map(|id| movie(id, "Same", &[])).collect();
        movies.push(movie(10, "Other", &[]));
        let catalog = Catalog::new(movies).unwrap();
        let reranker = DiversityReranker::new(&catalog, &[]);

        // The last entry would win (0.6 * 1.2) if it were scanned
        let mut ranked: Vec<ScoredMovie> = (0..9).map(|pos| scored(pos, 0.5)).collect();
        ranked.push(scored(9, 0.6));
        let out = reranker.rerank(&ranked, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, 0);
    }

    #[test]
    fn test_huge_k_scans_whole_list() {
        let catalog = Catalog::new(vec![movie(1, "A", &[]), movie(2, "B", &[])]).unwrap();
        let reranker = DiversityReranker::new(&catalog, &[]);

        let ranked = vec![scored(0, 0.9), scored(1, 0.4)];
        assert_eq!(reranker.rerank(&ranked, usize::MAX).len(), 2);
        assert_eq!(reranker.rerank(&ranked, 1 << 40).len(), 2);
    }

    #[test]
    fn test_genre_penalty_tiers() {
        let mut seen = SeenAttributes::default();
        let first = movie(1, "A", &["Drama", "Crime", "Thriller"]);
        seen.record(&first);

        assert_eq!(seen.genre_penalty(&movie(2, "B", &["Comedy"])), 1.0);
        assert_eq!(seen.genre_penalty(&movie(3, "B", &["Drama"])), 0.95);
        assert_eq!(seen.genre_penalty(&movie(4, "B", &["Drama", "Crime"])), 0.9);
        assert_eq!(
            seen.genre_penalty(&movie(5, "B", &["Drama", "Crime", "Thriller"])),
            0.8
        );
    }

    #[test]
    fn test_company_overlap_multipliers() {
        let mut seen = SeenAttributes::default();
        let mut first = movie(1, "", &[]);
        first.production_companies = vec!["A24".to_string(), "Neon".to_string()];
        let mut second = movie(2, "", &[]);
        second.production_companies = vec!["Focus".to_string(), "Annapurna".to_string()];
        seen.record(&first);
        seen.record(&second);

        let mut fresh = movie(3, "", &[]);
        fresh.production_companies = vec!["Pixar".to_string()];
        assert!((seen.diversity_multiplier(&fresh) - 1.15).abs() < 1e-12);

        // 1 shared of 4 seen studios: under half
        let mut some = movie(4, "", &[]);
        some.production_companies = vec!["A24".to_string()];
        assert!((seen.diversity_multiplier(&some) - 1.05).abs() < 1e-12);

        let mut most = movie(5, "", &[]);
        most.production_companies = vec!["A24".to_string(), "Neon".to_string()];
        assert!((seen.diversity_multiplier(&most) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_keyword_overlap_multipliers() {
        let mut seen = SeenAttributes::default();
        let mut first = movie(1, "", &[]);
        first.keywords = ["space", "alien", "robot", "war", "ship"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        seen.record(&first);

        let mut repeat = movie(2, "", &[]);
        repeat.keywords = first.keywords.clone();
        assert!((seen.diversity_multiplier(&repeat) - 0.85).abs() < 1e-12);

        let mut fresh = movie(3, "", &[]);
        fresh.keywords = vec!["love".to_string(), "paris".to_string()];
        assert!((seen.diversity_multiplier(&fresh) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_director_boosted_once() {
        let mut seen = SeenAttributes::default();
        let first = movie(1, "Unknown", &[]);
        assert!((seen.diversity_multiplier(&first) - 1.2).abs() < 1e-12);
        seen.record(&first);

        assert_eq!(seen.diversity_multiplier(&movie(2, "Unknown", &[])), 1.0);
        assert_eq!(seen.diversity_multiplier(&movie(3, "", &[])), 1.0);
    }

    #[test]
    fn test_new_decade_boost() {
        let mut seen = SeenAttributes::default();
        let mut first = movie(1, "", &[]);
        first.decade = Some("1980s".to_string());
        seen.record(&first);

        let mut same = movie(2, "", &[]);
        same.decade = Some("1980s".to_string());
        assert_eq!(seen.diversity_multiplier(&same), 1.0);

        let mut other = movie(3, "", &[]);
        other.decade = Some("1990s".to_string());
        assert!((seen.diversity_multiplier(&other) - 1.08).abs() < 1e-12);
    }

    #[test]
    fn test_franchise_affinity_with_liked_collection() {
        let series = Collection {
            id: 10,
            name: "Alien Collection".to_string(),
        };
        let mut liked = movie(1, "Scott", &[]);
        liked.belongs_to_collection = Some(series.clone());
        let mut sequel = movie(2, "Cameron", &[]);
        sequel.belongs_to_collection = Some(series);
        let mut other = movie(3, "Cameron", &[]);
        other.belongs_to_collection = Some(Collection {
            id: 11,
            name: "Terminator Collection".to_string(),
        });

        let catalog = Catalog::new(vec![liked, sequel, other]).unwrap();
        let reranker = DiversityReranker::new(&catalog, &[0]);
        assert_eq!(reranker.franchise_boost(catalog.at(1)), 1.3);
        assert_eq!(reranker.franchise_boost(catalog.at(2)), 1.0);
    }
}
