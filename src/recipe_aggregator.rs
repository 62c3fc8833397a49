use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::NutritionError;
use crate::nutritional_matcher::{round_half_even, NutrientLookup, NutrientProfile};
use crate::recipe::{IngredientEntry, Recipe};
use crate::recipe_converter::convert_ingredient;

/// Recipe-level nutrition. Calories are rounded to whole kcal, macros to one
/// decimal, ties to even. Stored recipe nutrition deserializes without the diagnostic fields.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutritionTotal {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub ingredients_matched: usize,
    #[serde(default)]
    pub total_ingredients: usize,
    /// Computed from ingredients rather than stored with the recipe
    #[serde(default)]
    pub calculated: bool,
}

impl NutritionTotal {
    fn add(&mut self, contribution: &NutrientProfile) {
        self.calories += contribution.calories;
        self.protein += contribution.protein;
        self.carbs += contribution.carbs;
        self.fat += contribution.fat;
        self.ingredients_matched += 1;
    }

    fn rounded(mut self) -> Self {
        self.calories = round_half_even(self.calories, 0);
        self.protein = round_half_even(self.protein, 1);
        self.carbs = round_half_even(self.carbs, 1);
        self.fat = round_half_even(self.fat, 1);
        self
    }
}

/// Per-100 g profile of the first food matching `ingredient`, or `None` when
/// the ingredient has to be skipped. Lookup errors are logged, never raised.
async fn lookup_profile<L: NutrientLookup>(ingredient: &IngredientEntry, lookup: &L) -> Option<NutrientProfile> {
    let name = ingredient.name.trim();
    if name.is_empty() {
        debug!("Skipping ingredient with empty name");
        return None;
    }

    let foods = match lookup.search_food(name).await {
        Ok(foods) => foods,
        Err(e) => {
            warn!("Food search failed for '{}': {:#}", name, e);
            return None;
        }
    };
    let Some(food) = foods.first() else {
        debug!("No food match for '{}'", name);
        return None;
    };

    match lookup.get_nutrition(food.id).await {
        Ok(Some(profile)) => {
            debug!("Matched '{}' to '{}' ({})", name, food.description, food.id);
            Some(profile)
        }
        Ok(None) => {
            debug!("No nutrient data for '{}' ({})", food.description, food.id);
            None
        }
        Err(e) => {
            warn!("Nutrition lookup failed for '{}' ({}): {:#}", name, food.id, e);
            None
        }
    }
}

/// Sums per-ingredient nutrition scaled by converted grams. Ingredients that
/// cannot be matched or looked up count toward `total_ingredients` only.
pub async fn aggregate<L: NutrientLookup>(
    ingredients: &[IngredientEntry],
    lookup: &L,
) -> Result<NutritionTotal, NutritionError> {
    if ingredients.is_empty() {
        return Err(NutritionError::NoIngredients);
    }

    let mut total = NutritionTotal {
        total_ingredients: ingredients.len(),
        calculated: true,
        ..Default::default()
    };

    for ingredient in ingredients {
        let Some(per_100g) = lookup_profile(ingredient, lookup).await else {
            continue;
        };
        let converted = convert_ingredient(ingredient);
        let contribution = per_100g.scaled(converted.quantity_grams / 100.0);
        debug!(
            "'{}': {} g -> {:.1} kcal",
            ingredient.name, converted.quantity_grams, contribution.calories
        );
        total.add(&contribution);
    }

    info!(
        "Aggregated nutrition: matched {}/{} ingredients",
        total.ingredients_matched, total.total_ingredients
    );
    Ok(total.rounded())
}

pub async fn aggregate_recipe<L: NutrientLookup>(
    recipe: &Recipe,
    lookup: &L,
) -> Result<NutritionTotal, NutritionError> {
    aggregate(&recipe.ingredients, lookup).await
}
