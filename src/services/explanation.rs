use std::collections::HashSet;

use crate::models::Movie;

use super::catalog::Catalog;
use super::features::MAX_CAST_MEMBERS;
use super::scoring::{MIN_VOTES_FOR_QUALITY, RATING_THRESHOLD_EXCELLENT, RATING_THRESHOLD_GOOD};
use super::vector_space::VectorSpaceModel;

/// Reasons listed per recommendation, highest priority first
pub const MAX_REASONS: usize = 4;

/// Fallback when no liked movie can serve as an anchor
pub const GENERIC_REASON: &str = "Recommended by content similarity.";

const SEPARATOR: &str = " · ";

/// Builds human-readable justifications for recommendations
pub struct Explainer<'a> {
    catalog: &'a Catalog,
    model: &'a VectorSpaceModel,
}

impl<'a> Explainer<'a> {
    pub fn new(catalog: &'a Catalog, model: &'a VectorSpaceModel) -> Self {
        Self { catalog, model }
    }

    /// Liked position most similar to `pos`; the first one wins ties
    pub fn anchor(&self, pos: usize, liked: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (liked_pos, sim) in self.model.pairwise(pos, liked) {
            match best {
                Some((_, best_sim)) if sim <= best_sim => {}
                _ => best = Some((liked_pos, sim)),
            }
        }
        best.map(|(liked_pos, _)| liked_pos)
    }

    /// Reason string for a personalized recommendation at `pos`
    pub fn explain(&self, pos: usize, liked: &[usize]) -> String {
        let Some(anchor_pos) = self.anchor(pos, liked) else {
            return GENERIC_REASON.to_string();
        };
        let movie = self.catalog.at(pos);
        let anchor = self.catalog.at(anchor_pos);

        let mut text = format!("Based on '{}'", anchor.title);

        let reasons = reasons(movie, anchor);
        if !reasons.is_empty() {
            text.push_str(SEPARATOR);
            text.push_str(&reasons.join(" | "));
        }

        if let Some(quality) = quality_note(movie) {
            text.push_str(SEPARATOR);
            text.push_str(&quality);
        }

        text
    }
}

/// Shared attributes between a movie and its anchor, in priority order
pub fn reasons(movie: &Movie, anchor: &Movie) -> Vec<String> {
    let mut reasons = Vec::new();

    // 1. Franchise
    if let (Some(collection), Some(anchor_id)) =
        (&movie.belongs_to_collection, anchor.collection_id())
    {
        if collection.id == anchor_id {
            reasons.push(format!("same franchise ({})", collection.name));
        }
    }

    // 2. Director
    if let (Some(director), Some(anchor_director)) =
        (movie.known_director(), anchor.known_director())
    {
        if director == anchor_director {
            reasons.push(format!("director: {}", director));
        }
    }

    // 3. Themes
    let keywords = shared(&movie.keywords, &anchor.keywords);
    match keywords.len() {
        0 => {}
        1 => reasons.push(format!("theme: {}", keywords[0])),
        2 => reasons.push(format!("themes: {}", keywords.join(", "))),
        _ => reasons.push(format!("themes: {}", keywords[..3].join(", "))),
    }

    // 4. Top-billed cast
    let cast = shared(
        &movie.cast[..movie.cast.len().min(MAX_CAST_MEMBERS)],
        &anchor.cast[..anchor.cast.len().min(MAX_CAST_MEMBERS)],
    );
    match cast.len() {
        0 => {}
        1 => reasons.push(format!("actor: {}", cast[0])),
        _ => reasons.push(format!("cast: {}", cast[..2].join(", "))),
    }

    // 5. Genres, alphabetical
    let mut genres = shared(&movie.genres, &anchor.genres);
    genres.sort_unstable();
    match genres.len() {
        0 => {}
        1 => reasons.push(format!("genre: {}", genres[0])),
        _ => reasons.push(format!("genres: {}", genres[..2].join(", "))),
    }

    // 6. Certification
    if let (Some(cert), Some(anchor_cert)) = (&movie.certification, &anchor.certification) {
        if !cert.is_empty() && cert == anchor_cert {
            reasons.push(format!("rated {}", cert));
        }
    }

    // 7. Era
    if let (Some(decade), Some(anchor_decade)) = (&movie.decade, &anchor.decade) {
        if !decade.is_empty() && decade == anchor_decade {
            reasons.push(format!("era: {}", decade));
        }
    }

    // 8. Studio
    if let Some(company) = shared(&movie.production_companies, &anchor.production_companies).first()
    {
        reasons.push(format!("studio: {}", company));
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// Rating annotation for well-voted movies
///
/// Rating and vote count at 8.0 and above, rating only from 7.0.
pub fn quality_note(movie: &Movie) -> Option<String> {
    let (rating, votes) = (movie.vote_average?, movie.vote_count?);
    if votes <= MIN_VOTES_FOR_QUALITY {
        return None;
    }

    if rating >= RATING_THRESHOLD_EXCELLENT {
        Some(format!("★ {:.1}/10 ({} votes)", rating, votes))
    } else if rating >= RATING_THRESHOLD_GOOD {
        Some(format!("★ {:.1}/10", rating))
    } else {
        None
    }
}

/// Non-personalized reason for cold start picks; never names an anchor
pub fn cold_start_reason(movie: &Movie) -> String {
    let mut parts = vec!["Popular pick".to_string()];
    if let Some(rating) = movie.vote_average {
        parts.push(format!("rated {:.1}/10", rating));
    }
    if let Some(popularity) = movie.popularity {
        parts.push(format!("popularity {:.0}", popularity));
    }
    parts.join(SEPARATOR)
}

/// Values of `values` also present in `other`, deduplicated, in `values` order
fn shared<'m>(values: &'m [String], other: &[String]) -> Vec<&'m str> {
    let other: HashSet<&str> = other.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    values
        .iter()
        .map(String::as_str)
        .filter(|v| other.contains(*v) && seen.insert(*v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;
    use crate::services::features::synthesize;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn base(id: u64, title: &str) -> Movie {
        Movie::new(id, title, 1999)
    }

    #[test]
    fn test_reason_priority_and_cap() {
        let collection = Collection {
            id: 2344,
            name: "The Matrix Collection".to_string(),
        };
        let mut movie = base(1, "The Matrix Reloaded");
        movie.belongs_to_collection = Some(collection.clone());
        movie.director = "Lana Wachowski".to_string();
        movie.keywords = strings(&["simulation", "hacker", "prophecy", "kung fu"]);
        movie.cast = strings(&["Keanu Reeves", "Carrie-Anne Moss"]);
        movie.genres = strings(&["Science Fiction", "Action"]);

        let mut anchor = base(2, "The Matrix");
        anchor.belongs_to_collection = Some(collection);
        anchor.director = "Lana Wachowski".to_string();
        anchor.keywords = strings(&["kung fu", "simulation", "hacker", "prophecy"]);
        anchor.cast = strings(&["Keanu Reeves", "Carrie-Anne Moss"]);
        anchor.genres = strings(&["Action", "Science Fiction"]);

        let reasons = reasons(&movie, &anchor);
        assert_eq!(
            reasons,
            vec![
                "same franchise (The Matrix Collection)".to_string(),
                "director: Lana Wachowski".to_string(),
                "themes: simulation, hacker, prophecy".to_string(),
                "cast: Keanu Reeves, Carrie-Anne Moss".to_string(),
            ]
        );
    }

    #[test]
    fn test_singular_formats() {
        let mut movie = base(1, "A");
        movie.keywords = strings(&["heist"]);
        movie.cast = strings(&["Al Pacino"]);
        movie.genres = strings(&["Crime"]);
        let mut anchor = base(2, "B");
        anchor.keywords = strings(&["heist", "bank"]);
        anchor.cast = strings(&["Al Pacino", "Robert De Niro"]);
        anchor.genres = strings(&["Crime", "Drama"]);

        assert_eq!(
            reasons(&movie, &anchor),
            vec!["theme: heist", "actor: Al Pacino", "genre: Crime"]
        );
    }

    #[test]
    fn test_lower_priority_reasons() {
        let mut movie = base(1, "A");
        movie.genres = strings(&["Thriller", "Drama", "Crime"]);
        movie.certification = Some("R".to_string());
        movie.decade = Some("1990s".to_string());
        movie.production_companies = strings(&["Miramax"]);
        let mut anchor = movie.clone();
        anchor.id = 2;

        assert_eq!(
            reasons(&movie, &anchor),
            vec!["genres: Crime, Drama", "rated R", "era: 1990s", "studio: Miramax"]
        );
    }

    #[test]
    fn test_unknown_director_never_matches() {
        let movie = base(1, "A");
        let anchor = base(2, "B");
        assert!(reasons(&movie, &anchor).is_empty());
    }

    #[test]
    fn test_quality_note() {
        let mut movie = base(1, "A");
        assert_eq!(quality_note(&movie), None);

        movie.vote_average = Some(8.4);
        movie.vote_count = Some(1200);
        assert_eq!(quality_note(&movie).as_deref(), Some("★ 8.4/10 (1200 votes)"));

        movie.vote_average = Some(7.2);
        assert_eq!(quality_note(&movie).as_deref(), Some("★ 7.2/10"));

        movie.vote_average = Some(6.9);
        assert_eq!(quality_note(&movie), None);

        movie.vote_average = Some(9.0);
        movie.vote_count = Some(50);
        assert_eq!(quality_note(&movie), None);
    }

    #[test]
    fn test_cold_start_reason() {
        let mut movie = base(1, "A");
        assert_eq!(cold_start_reason(&movie), "Popular pick");

        movie.vote_average = Some(7.0);
        movie.popularity = Some(50.2);
        assert_eq!(cold_start_reason(&movie), "Popular pick · rated 7.0/10 · popularity 50");
    }

    #[test]
    fn test_explain_uses_most_similar_liked_movie() {
        let mut target = base(1, "Aliens");
        target.genres = strings(&["Horror", "Science Fiction"]);
        target.keywords = strings(&["xenomorph", "space"]);
        let mut close = base(2, "Alien");
        close.genres = strings(&["Horror", "Science Fiction"]);
        close.keywords = strings(&["xenomorph", "space"]);
        let mut far = base(3, "Amelie");
        far.genres = strings(&["Romance"]);
        far.keywords = strings(&["paris"]);

        let catalog = Catalog::new(vec![target, close, far]).unwrap();
        let docs: Vec<String> = catalog.movies().iter().map(synthesize).collect();
        let model = VectorSpaceModel::build(&docs).unwrap();
        let explainer = Explainer::new(&catalog, &model);

        assert_eq!(explainer.anchor(0, &[2, 1]), Some(1));
        assert_eq!(
            explainer.explain(0, &[2, 1]),
            "Based on 'Alien' · themes: xenomorph, space | genres: Horror, Science Fiction"
        );
        assert_eq!(explainer.explain(0, &[]), GENERIC_REASON);
    }
}
