use serde::{Deserialize, Serialize};

/// Stable catalog identifier for a movie
pub type MovieId = u64;

/// Director placeholder written by ingestion when the credit is missing
pub const UNKNOWN_DIRECTOR: &str = "Unknown";

/// Franchise or collection a movie belongs to (e.g. a film series)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: u64,
    pub name: String,
}

/// A catalog movie record
///
/// Optional members are "unknown" when absent and are never read as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default = "default_director")]
    pub director: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<String>,
    #[serde(default)]
    pub production_countries: Vec<String>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub decade: Option<String>,
    #[serde(default)]
    pub popularity_tier: Option<String>,
    #[serde(default)]
    pub belongs_to_collection: Option<Collection>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
}

fn default_director() -> String {
    UNKNOWN_DIRECTOR.to_string()
}

/// Popularity at or above which a movie is labelled "Viral"
const TIER_VIRAL: f64 = 50.0;
/// Popularity at or above which a movie is labelled "High"
const TIER_HIGH: f64 = 20.0;
/// Popularity at or above which a movie is labelled "Medium"
const TIER_MEDIUM: f64 = 5.0;

impl Movie {
    /// Creates a bare record with only the required fields set
    pub fn new(id: MovieId, title: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            genres: Vec::new(),
            director: default_director(),
            description: String::new(),
            overview: None,
            tagline: None,
            original_language: None,
            keywords: Vec::new(),
            cast: Vec::new(),
            production_companies: Vec::new(),
            production_countries: Vec::new(),
            certification: None,
            decade: None,
            popularity_tier: None,
            belongs_to_collection: None,
            popularity: None,
            vote_average: None,
            vote_count: None,
        }
    }

    /// Resolves derived and fallback fields once, at the ingestion boundary
    ///
    /// - `description` and `overview` fill each other when one is missing
    /// - `decade` is derived from `year` (e.g. "1990s")
    /// - `popularity_tier` is derived from `popularity` when it is known
    ///
    /// Values already supplied by the ingestion pipeline are kept.
    pub fn normalize(mut self) -> Self {
        if self.description.trim().is_empty() {
            if let Some(overview) = &self.overview {
                self.description = overview.clone();
            }
        }
        if self.overview.is_none() && !self.description.trim().is_empty() {
            self.overview = Some(self.description.clone());
        }

        if self.decade.is_none() {
            self.decade = Some(decade_label(self.year));
        }

        if self.popularity_tier.is_none() {
            self.popularity_tier = self.popularity.map(|p| popularity_tier(p).to_string());
        }

        self
    }

    /// Synopsis text, preferring the long-form overview
    pub fn synopsis(&self) -> &str {
        match &self.overview {
            Some(overview) if !overview.trim().is_empty() => overview,
            _ => &self.description,
        }
    }

    /// Director name, or `None` when the credit is unknown
    pub fn known_director(&self) -> Option<&str> {
        let director = self.director.trim();
        if director.is_empty() || director.eq_ignore_ascii_case(UNKNOWN_DIRECTOR) {
            None
        } else {
            Some(director)
        }
    }

    /// Collection id, if the movie belongs to a franchise
    pub fn collection_id(&self) -> Option<u64> {
        self.belongs_to_collection.as_ref().map(|c| c.id)
    }
}

/// Decade label for a release year, e.g. 1994 -> "1990s"
pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Coarse popularity bucket used as a feature token
pub fn popularity_tier(popularity: f64) -> &'static str {
    if popularity >= TIER_VIRAL {
        "Viral"
    } else if popularity >= TIER_HIGH {
        "High"
    } else if popularity >= TIER_MEDIUM {
        "Medium"
    } else {
        "Low"
    }
}
