//! # Nutrient Lookup Contract
//!
//! The aggregator only knows foods through [`NutrientLookup`]: a name search
//! returning candidate foods, then a per-100 g nutrient profile for the
//! chosen candidate. Implementations live in [`crate::api_connection`] (USDA
//! FoodData Central, optionally behind an LRU cache) and
//! [`crate::nutrient_table`] (offline CSV table).

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Candidates whose description contains one of these are processed forms
/// with misleading per-100 g values.
pub const SKIP_KEYWORDS: &[&str] = &[
    "dehydrated",
    "dried",
    "powder",
    "concentrated",
    "freeze-dried",
    "canned",
];

/// Most candidates a search returns.
pub const MAX_FOOD_CANDIDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodMatch {
    pub id: u64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Nutrients per 100 g; missing nutrients are 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutrientProfile {
    pub fn scaled(&self, multiplier: f64) -> NutrientProfile {
        NutrientProfile {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }
}

/// Rounds to `decimals` places. Ties go to the even digit, judged on the exact
/// binary value: 232.5 becomes 232 and 0.25 becomes 0.2, while 1.1 * 1.5
/// (stored just above 1.65) becomes 1.7.
pub fn round_half_even(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

#[allow(async_fn_in_trait)]
pub trait NutrientLookup {
    /// Candidate foods for an ingredient name, best first. An empty list is a
    /// no-match, not an error.
    async fn search_food(&self, name: &str) -> Result<Vec<FoodMatch>>;

    /// Per-100 g nutrients, or `None` when the food carries no usable data.
    async fn get_nutrition(&self, food_id: u64) -> Result<Option<NutrientProfile>>;
}

impl<L: NutrientLookup> NutrientLookup for &L {
    async fn search_food(&self, name: &str) -> Result<Vec<FoodMatch>> {
        (**self).search_food(name).await
    }

    async fn get_nutrition(&self, food_id: u64) -> Result<Option<NutrientProfile>> {
        (**self).get_nutrition(food_id).await
    }
}

pub fn is_processed_form(description: &str) -> bool {
    let description = description.to_lowercase();
    SKIP_KEYWORDS.iter().any(|keyword| description.contains(keyword))
}

/// Drops processed forms. If that leaves nothing, the first unfiltered
/// candidates are used instead. At most [`MAX_FOOD_CANDIDATES`] are returned.
pub fn filter_food_candidates(candidates: Vec<FoodMatch>) -> Vec<FoodMatch> {
    let filtered: Vec<FoodMatch> = candidates
        .iter()
        .filter(|food| !is_processed_form(&food.description))
        .take(MAX_FOOD_CANDIDATES)
        .cloned()
        .collect();

    if filtered.is_empty() {
        candidates.into_iter().take(MAX_FOOD_CANDIDATES).collect()
    } else {
        filtered
    }
}
