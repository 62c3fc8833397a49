//! # Error Types Module
//!
//! Typed errors surfaced by the recommendation and nutrition entry points.
//! No-match conditions and malformed quantities are never errors; only
//! precondition violations and invalid configuration end up here.

use thiserror::Error;

/// Errors returned by [`crate::recommender::Recommender`].
#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    /// The caller supplied an empty ingredient list
    #[error("no ingredients provided")]
    NoIngredients,
}

/// Errors returned by [`crate::recipe_aggregator::aggregate`].
#[derive(Debug, Error, PartialEq)]
pub enum NutritionError {
    /// The recipe carries no ingredients to aggregate
    #[error("recipe has no ingredients")]
    NoIngredients,
}

/// Errors raised while loading or validating [`crate::config::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("hybrid alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("fuzzy threshold must lie in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),
}
