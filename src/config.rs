//! # Configuration Module
//!
//! Tunables for matching, ranking, the USDA adapter and ingredient fusion.
//! Every section falls back to its defaults, so a TOML file only needs the
//! keys it wants to override:
//!
//! ```toml
//! [recommender]
//! alpha = 0.8
//!
//! [usda]
//! timeout_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_ALPHA: f64 = 0.9;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MAX_FEATURES: usize = 1000;

pub const USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const USDA_API_KEY_ENV_VAR: &str = "USDA_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub recommender: RecommenderConfig,
    pub usda: UsdaConfig,
    pub fusion: FusionConfig,
}

/// Ranking weights and matching thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Weight of the ingredient match score in the hybrid score
    pub alpha: f64,
    /// Minimum word-overlap ratio for two names to be considered the same ingredient
    pub fuzzy_threshold: f64,
    /// Number of recipes returned when the caller does not ask for a count
    pub top_n: usize,
    /// Vocabulary cap for the TF-IDF vectorizer
    pub max_features: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

/// USDA FoodData Central adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsdaConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key (never the key itself)
    pub api_key_env_var: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    /// LRU capacity of the food-search cache
    pub search_cache_capacity: usize,
    /// LRU capacity of the nutrient-by-id cache
    pub nutrition_cache_capacity: usize,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            base_url: USDA_BASE_URL.to_string(),
            api_key_env_var: USDA_API_KEY_ENV_VAR.to_string(),
            timeout_secs: 10,
            page_size: 10,
            search_cache_capacity: 1000,
            nutrition_cache_capacity: 500,
        }
    }
}

/// Settings for merging classifier detections with OCR text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Classifier detections at or below this confidence are dropped
    pub min_confidence: f64,
    /// Confidence given to an ingredient read from OCR text
    pub ocr_confidence: f64,
    /// Words recognised as ingredients in OCR text
    pub known_ingredients: Vec<String>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.15,
            ocr_confidence: 0.9,
            known_ingredients: [
                "banana", "milk", "egg", "flour", "sugar", "butter", "onion", "tomato", "garlic",
                "cheese", "oil",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl AppConfig {
    /// Load a TOML config file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.recommender.validate()?;
        if self.usda.search_cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("usda.search_cache_capacity"));
        }
        if self.usda.nutrition_cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("usda.nutrition_cache_capacity"));
        }
        Ok(())
    }
}

impl RecommenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.fuzzy_threshold));
        }
        if self.max_features == 0 {
            return Err(ConfigError::ZeroCapacity("recommender.max_features"));
        }
        Ok(())
    }
}
