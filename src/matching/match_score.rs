//! # Match Score
//!
//! Strict, user-centric ingredient match: the score is the share of the
//! user's ingredients found in the recipe. A recipe that contains none of the
//! user's ingredients scores exactly zero, however many ingredients it has.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::fuzzy::FuzzyMatcher;
use crate::recipe::{Recipe, ScoredRecipe};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `matched_count / total_count`, in [0, 1]
    pub score: f64,
    /// User ingredients found in the recipe
    pub matched_count: usize,
    /// Number of user ingredients
    pub total_count: usize,
}

impl MatchResult {
    fn empty(total_count: usize) -> Self {
        Self {
            score: 0.0,
            matched_count: 0,
            total_count,
        }
    }
}

pub fn match_details<S: AsRef<str> + Sync>(
    user_ingredients: &[S],
    recipe: &Recipe,
    matcher: &FuzzyMatcher,
) -> MatchResult {
    let total = user_ingredients.len();
    if user_ingredients.is_empty() || recipe.ingredients.is_empty() {
        return MatchResult::empty(total);
    }

    let matched = user_ingredients
        .iter()
        .filter(|user_ing| matcher.matches_any(user_ing.as_ref(), recipe.ingredient_names()))
        .count();

    if matched == 0 {
        return MatchResult::empty(total);
    }

    MatchResult {
        score: matched as f64 / total as f64,
        matched_count: matched,
        total_count: total,
    }
}

pub fn calculate_match_score<S: AsRef<str> + Sync>(
    user_ingredients: &[S],
    recipe: &Recipe,
    matcher: &FuzzyMatcher,
) -> f64 {
    match_details(user_ingredients, recipe, matcher).score
}

/// Writes `match_score` onto every recipe. Order is preserved.
pub fn annotate_match_scores<S: AsRef<str> + Sync>(
    user_ingredients: &[S],
    recipes: &mut [ScoredRecipe],
    matcher: &FuzzyMatcher,
) {
    recipes.par_iter_mut().for_each(|scored| {
        scored.match_score = Some(calculate_match_score(user_ingredients, &scored.recipe, matcher));
    });
}

/// Annotates the whole corpus with match scores and sorts it descending.
/// Recipes with equal scores keep their corpus order.
pub fn rank_recipes_by_ingredients<S: AsRef<str> + Sync>(
    user_ingredients: &[S],
    recipes: &[Recipe],
    matcher: &FuzzyMatcher,
) -> Vec<ScoredRecipe> {
    let mut scored: Vec<ScoredRecipe> = recipes.iter().cloned().map(ScoredRecipe::from).collect();
    annotate_match_scores(user_ingredients, &mut scored, matcher);
    scored.sort_by(|a, b| {
        b.match_score
            .unwrap_or(0.0)
            .total_cmp(&a.match_score.unwrap_or(0.0))
    });
    scored
}
