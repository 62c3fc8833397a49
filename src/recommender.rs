//! # Hybrid Recommender
//!
//! Ranks a recipe corpus against a confidence-ordered ingredient list. The
//! hybrid mode runs, in order:
//!
//! 1. deduplicate by lowercased recipe name (first occurrence wins)
//! 2. score ingredient matches and drop every recipe scoring zero
//! 3. narrow to recipes containing the primary (first) ingredient, unless
//!    that leaves nothing
//! 4. TF-IDF similarity over the narrowed set only
//! 5. `hybrid = alpha * match + (1 - alpha) * similarity`, sorted descending

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::RecommenderConfig;
use crate::error::RecommendError;
use crate::matching::fuzzy::FuzzyMatcher;
use crate::matching::match_score::{annotate_match_scores, rank_recipes_by_ingredients};
use crate::matching::normalizer::normalize;
use crate::recipe::{Recipe, ScoredRecipe};
use crate::search::content_ranker::ContentSimilarityRanker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecommendMethod {
    #[default]
    Hybrid,
    /// TF-IDF similarity over the full corpus, no ingredient filter
    Content,
    /// Match score over the full corpus, no TF-IDF
    Ingredient,
}

/// Keeps the first recipe of every lowercased name, preserving order.
pub fn dedup_by_name(recipes: &[Recipe]) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .iter()
        .filter(|recipe| seen.insert(recipe.name.to_lowercase()))
        .cloned()
        .collect()
}

pub struct Recommender {
    matcher: FuzzyMatcher,
    ranker: ContentSimilarityRanker,
    alpha: f64,
    top_n: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(&RecommenderConfig::default())
    }
}

impl Recommender {
    pub fn new(config: &RecommenderConfig) -> Self {
        Self {
            matcher: FuzzyMatcher::new(config.fuzzy_threshold),
            ranker: ContentSimilarityRanker::new(config.max_features),
            alpha: config.alpha,
            top_n: config.top_n,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    pub fn default_top_n(&self) -> usize {
        self.top_n
    }

    /// Entry point used by callers: rejects an empty ingredient list, then dispatches on `method`.
    pub fn recommend<S: AsRef<str> + Sync>(
        &self,
        user_ingredients: &[S],
        recipes: &[Recipe],
        method: RecommendMethod,
        top_n: Option<usize>,
    ) -> Result<Vec<ScoredRecipe>, RecommendError> {
        if user_ingredients.iter().all(|ing| normalize(ing.as_ref()).is_empty()) {
            return Err(RecommendError::NoIngredients);
        }
        let top_n = top_n.unwrap_or(self.top_n);
        info!(
            "Recommending with method {:?} over {} recipes for {} ingredients",
            method,
            recipes.len(),
            user_ingredients.len()
        );

        let results = match method {
            RecommendMethod::Content => {
                self.ranker
                    .content_based_filtering(user_ingredients, recipes, top_n)
            }
            RecommendMethod::Ingredient => {
                let mut ranked =
                    rank_recipes_by_ingredients(user_ingredients, recipes, &self.matcher);
                ranked.truncate(top_n);
                ranked
            }
            RecommendMethod::Hybrid => self.hybrid_recommendation(user_ingredients, recipes, top_n),
        };
        debug!("Returning {} recommendations", results.len());
        Ok(results)
    }

    pub fn hybrid_recommendation<S: AsRef<str> + Sync>(
        &self,
        user_ingredients: &[S],
        recipes: &[Recipe],
        top_n: usize,
    ) -> Vec<ScoredRecipe> {
        if recipes.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<ScoredRecipe> = dedup_by_name(recipes)
            .into_iter()
            .map(ScoredRecipe::from)
            .collect();
        annotate_match_scores(user_ingredients, &mut candidates, &self.matcher);

        let relevant: Vec<ScoredRecipe> = candidates
            .into_iter()
            .filter(|r| r.match_score.unwrap_or(0.0) > 0.0)
            .collect();
        debug!("{} recipes share at least one ingredient", relevant.len());

        let mut narrowed = match user_ingredients.first() {
            Some(primary) if !relevant.is_empty() => self.narrow_to_primary(primary.as_ref(), relevant),
            _ => relevant,
        };
        if narrowed.is_empty() {
            return Vec::new();
        }

        self.ranker.annotate(user_ingredients, &mut narrowed);
        for recipe in narrowed.iter_mut() {
            let match_score = recipe.match_score.unwrap_or(0.0);
            let similarity = recipe.similarity_score.unwrap_or(0.0);
            recipe.hybrid_score = Some(self.alpha * match_score + (1.0 - self.alpha) * similarity);
        }

        narrowed.sort_by(|a, b| {
            b.hybrid_score
                .unwrap_or(0.0)
                .total_cmp(&a.hybrid_score.unwrap_or(0.0))
        });
        narrowed.truncate(top_n);
        narrowed
    }

    /// Recipes containing the primary ingredient, or all of `relevant` if none do.
    fn narrow_to_primary(&self, primary: &str, relevant: Vec<ScoredRecipe>) -> Vec<ScoredRecipe> {
        let (with_primary, without): (Vec<_>, Vec<_>) = relevant
            .into_iter()
            .partition(|r| self.matcher.matches_any(primary, r.recipe.ingredient_names()));

        if with_primary.is_empty() {
            debug!("No recipe contains primary ingredient '{}', keeping all", primary);
            without
        } else {
            debug!(
                "Narrowed to {} recipes containing primary ingredient '{}'",
                with_primary.len(),
                primary
            );
            with_primary
        }
    }
}
