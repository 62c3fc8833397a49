use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::recipe::Recipe;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeFilters {
    pub cuisine: Option<String>,
    pub dietary_type: Option<String>,
    /// Minutes; recipes without a cooking time are excluded when set
    pub max_cooking_time: Option<u32>,
}

impl RecipeFilters {
    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.dietary_type.is_none() && self.max_cooking_time.is_none()
    }

    pub fn accepts(&self, recipe: &Recipe) -> bool {
        if let Some(cuisine) = &self.cuisine {
            if recipe.cuisine.as_ref() != Some(cuisine) {
                return false;
            }
        }
        if let Some(dietary_type) = &self.dietary_type {
            if recipe.dietary_type.as_ref() != Some(dietary_type) {
                return false;
            }
        }
        match (self.max_cooking_time, recipe.cooking_time) {
            (Some(max), Some(minutes)) => minutes <= max,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub cuisines: Vec<String>,
    pub dietary_types: Vec<String>,
}

fn distinct_values<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Source of the recipe corpus handed to the recommender.
pub trait RecipeRepository {
    fn get_all_recipes(&self) -> Result<Vec<Recipe>>;

    fn search(&self, filters: &RecipeFilters) -> Result<Vec<Recipe>> {
        let recipes = self.get_all_recipes()?;
        if filters.is_empty() {
            return Ok(recipes);
        }
        Ok(recipes.into_iter().filter(|r| filters.accepts(r)).collect())
    }

    /// Sorted, distinct, non-empty cuisines and dietary types.
    fn filter_options(&self) -> Result<FilterOptions> {
        let recipes = self.get_all_recipes()?;
        Ok(FilterOptions {
            cuisines: distinct_values(recipes.iter().map(|r| r.cuisine.as_deref())),
            dietary_types: distinct_values(recipes.iter().map(|r| r.dietary_type.as_deref())),
        })
    }
}

/// Recipe corpus held in memory, loaded from a JSON array on disk.
#[derive(Debug, Clone, Default)]
pub struct JsonRecipeStore {
    recipes: Vec<Recipe>,
}

impl JsonRecipeStore {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Recipe file not found at: {:?}", path));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file at {:?}", path))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse recipes from {:?}", path))?;
        info!("Loaded {} recipes from {:?}", recipes.len(), path);
        Ok(Self { recipes })
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeRepository for JsonRecipeStore {
    fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }
}
