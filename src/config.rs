use serde::Deserialize;

use crate::services::{RecommenderConfig, DEFAULT_REFERENCE_YEAR};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the JSON catalog produced by the ingestion pipeline
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Year used as "now" by the recency boost
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,

    /// Recommendation count when a request does not specify one
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Upper bound on the recommendation count of a single request
    #[serde(default = "default_max_k")]
    pub max_k: usize,
}

fn default_catalog_path() -> String {
    "data/movies.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_reference_year() -> i32 {
    DEFAULT_REFERENCE_YEAR
}

fn default_k() -> usize {
    10
}

fn default_max_k() -> usize {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn recommender(&self) -> RecommenderConfig {
        RecommenderConfig {
            reference_year: self.reference_year,
        }
    }
}
