use std::sync::LazyLock;

use regex::Regex;

use crate::models::Movie;

// Field weights: a field's token group is repeated this many times
pub const WEIGHT_GENRES: usize = 5;
pub const WEIGHT_KEYWORDS: usize = 6;
pub const WEIGHT_DIRECTOR: usize = 3;
pub const WEIGHT_CAST: usize = 2;
pub const WEIGHT_CERTIFICATION: usize = 2;
pub const WEIGHT_DEFAULT: usize = 1;

// Slice limits
pub const MAX_CAST_MEMBERS: usize = 5;
pub const MAX_COMPANIES: usize = 3;
pub const MAX_COUNTRIES: usize = 2;
pub const MAX_OVERVIEW_WORDS: usize = 150;

/// Word pattern: two or more word characters
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w\w+").expect("compile word pattern"));

/// Synthesizes the weighted pseudo-document for one movie
///
/// Every token is namespaced with its field prefix (`genres:drama`,
/// `director:nolan`) so the same word in two fields stays two terms. Field
/// weights are applied by repeating the field's token group.
pub fn synthesize(movie: &Movie) -> String {
    let overview: Vec<&str> = movie
        .synopsis()
        .split_whitespace()
        .take(MAX_OVERVIEW_WORDS)
        .collect();

    let fields: [(&str, String, usize); 12] = [
        ("genres", join(&movie.genres), WEIGHT_GENRES),
        ("keywords", join(&movie.keywords), WEIGHT_KEYWORDS),
        ("director", movie.director.clone(), WEIGHT_DIRECTOR),
        ("cast", join(head(&movie.cast, MAX_CAST_MEMBERS)), WEIGHT_CAST),
        (
            "companies",
            join(head(&movie.production_companies, MAX_COMPANIES)),
            WEIGHT_DEFAULT,
        ),
        (
            "certification",
            movie.certification.clone().unwrap_or_default(),
            WEIGHT_CERTIFICATION,
        ),
        ("decade", movie.decade.clone().unwrap_or_default(), WEIGHT_DEFAULT),
        (
            "language",
            movie.original_language.clone().unwrap_or_default(),
            WEIGHT_DEFAULT,
        ),
        (
            "countries",
            join(head(&movie.production_countries, MAX_COUNTRIES)),
            WEIGHT_DEFAULT,
        ),
        (
            "popularity",
            movie.popularity_tier.clone().unwrap_or_default(),
            WEIGHT_DEFAULT,
        ),
        ("tagline", movie.tagline.clone().unwrap_or_default(), WEIGHT_DEFAULT),
        ("overview", overview.join(" "), WEIGHT_DEFAULT),
    ];

    let mut tokens: Vec<String> = Vec::new();
    for (prefix, text, weight) in fields {
        let group = field_tokens(prefix, &text);
        if group.is_empty() {
            continue;
        }
        for _ in 0..weight {
            tokens.extend(group.iter().cloned());
        }
    }

    tokens.join(" ")
}

/// Splits a synthesized document back into its terms
pub fn tokenize(document: &str) -> impl Iterator<Item = &str> {
    document.split_whitespace()
}

/// Lower-cases, strips periods and namespaces the words of one field
fn field_tokens(prefix: &str, text: &str) -> Vec<String> {
    let normalized = text.trim().to_lowercase().replace('.', "");
    WORD.find_iter(&normalized)
        .map(|word| format!("{}:{}", prefix, word.as_str()))
        .collect()
}

fn head(values: &[String], n: usize) -> &[String] {
    &values[..values.len().min(n)]
}

fn join(values: &[String]) -> String {
    values.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(doc: &str, term: &str) -> usize {
        tokenize(doc).filter(|t| *t == term).count()
    }

    fn sample() -> Movie {
        let mut movie = Movie::new(1, "Inception", 2010);
        movie.genres = vec!["Action".to_string(), "Science Fiction".to_string()];
        movie.keywords = vec!["dream".to_string(), "heist".to_string()];
        movie.director = "Christopher Nolan".to_string();
        movie.cast = vec![
            "Leonardo DiCaprio".to_string(),
            "Joseph Gordon-Levitt".to_string(),
            "Elliot Page".to_string(),
            "Tom Hardy".to_string(),
            "Ken Watanabe".to_string(),
            "Cillian Murphy".to_string(),
        ];
        movie.certification = Some("PG-13".to_string());
        movie.decade = Some("2010s".to_string());
        movie.overview = Some("A thief who steals corporate secrets through dreams.".to_string());
        movie
    }

    #[test]
    fn test_field_weights_by_repetition() {
        let doc = synthesize(&sample());
        assert_eq!(count(&doc, "genres:action"), WEIGHT_GENRES);
        assert_eq!(count(&doc, "keywords:dream"), WEIGHT_KEYWORDS);
        assert_eq!(count(&doc, "director:nolan"), WEIGHT_DIRECTOR);
        assert_eq!(count(&doc, "cast:hardy"), WEIGHT_CAST);
        assert_eq!(count(&doc, "certification:pg"), WEIGHT_CERTIFICATION);
        assert_eq!(count(&doc, "decade:2010s"), 1);
    }

    #[test]
    fn test_cast_limited_to_first_members() {
        let doc = synthesize(&sample());
        assert_eq!(count(&doc, "cast:watanabe"), WEIGHT_CAST);
        assert_eq!(count(&doc, "cast:murphy"), 0);
    }

    #[test]
    fn test_fields_are_namespaced() {
        let mut movie = sample();
        movie.keywords = vec!["action".to_string()];
        let doc = synthesize(&movie);
        assert_eq!(count(&doc, "genres:action"), WEIGHT_GENRES);
        assert_eq!(count(&doc, "keywords:action"), WEIGHT_KEYWORDS);
    }

    #[test]
    fn test_punctuation_normalized() {
        let mut movie = sample();
        movie.director = "J.J. Abrams".to_string();
        let doc = synthesize(&movie);
        assert_eq!(count(&doc, "director:jj"), WEIGHT_DIRECTOR);
        assert_eq!(count(&doc, "overview:dreams"), 1);
    }

    #[test]
    fn test_overview_word_cap() {
        let mut movie = Movie::new(2, "Long", 2000);
        let words: Vec<String> = (0..200).map(|i| format!("w{}", i)).collect();
        movie.overview = Some(words.join(" "));
        let doc = synthesize(&movie);
        assert_eq!(count(&doc, "overview:w149"), 1);
        assert_eq!(count(&doc, "overview:w150"), 0);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        assert_eq!(synthesize(&sample()), synthesize(&sample()));
    }
}
