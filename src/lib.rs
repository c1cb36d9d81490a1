//! Content-based movie recommendations from liked and disliked movies.
//!
//! The [`services::Recommender`] is built once from a catalog and then serves
//! read-only `recommend` calls; [`routes`] hosts it behind a small HTTP API.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
