pub mod catalog;
pub mod diversity;
pub mod explanation;
pub mod features;
pub mod recommendations;
pub mod scoring;
pub mod vector_space;

pub use catalog::{Catalog, CatalogError};
pub use recommendations::{Recommender, RecommenderConfig, DEFAULT_REFERENCE_YEAR};
