//! # Fuzzy Ingredient Matching
//!
//! Decides whether two ingredient names refer to the same thing. Plurals
//! ("tomato" / "tomatoes") and extra adjectives ("onion" / "red onion") match:
//!
//! 1. exact match after normalization
//! 2. substring containment in either direction (no threshold)
//! 3. word overlap `|A ∩ B| / max(|A|, |B|) >= threshold`

use log::trace;
use std::collections::HashSet;

use super::normalizer::{normalize, word_set};
use crate::config::DEFAULT_FUZZY_THRESHOLD;

/// Ingredient name matcher with a configurable word-overlap threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn matches(&self, a: &str, b: &str) -> bool {
        fuzzy_match_ingredient(a, b, self.threshold)
    }

    /// True if any of `candidates` matches `name`.
    pub fn matches_any<'a, I>(&self, name: &str, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates.into_iter().any(|candidate| self.matches(name, candidate))
    }
}

/// Returns true when `a` and `b` name the same ingredient.
///
/// Names that are empty after trimming never match.
pub fn fuzzy_match_ingredient(a: &str, b: &str, threshold: f64) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b {
        return true;
    }

    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    let words_a = word_set(&a);
    let words_b = word_set(&b);
    let overlap = words_a.intersection(&words_b).count();
    if overlap == 0 {
        return false;
    }
    let ratio = overlap as f64 / words_a.len().max(words_b.len()) as f64;
    trace!("Word overlap '{}' vs '{}': {:.2}", a, b, ratio);
    ratio >= threshold
}

fn normalized_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names.iter().map(|name| normalize(name.as_ref())).collect()
}

/// True iff every recipe ingredient is present in the user's ingredients.
pub fn exact_match<U: AsRef<str>, R: AsRef<str>>(user_ingredients: &[U], recipe_ingredients: &[R]) -> bool {
    let user_set = normalized_set(user_ingredients);
    normalized_set(recipe_ingredients).is_subset(&user_set)
}

/// Share of the recipe's distinct ingredients that the user has.
pub fn partial_match<U: AsRef<str>, R: AsRef<str>>(user_ingredients: &[U], recipe_ingredients: &[R]) -> f64 {
    if recipe_ingredients.is_empty() {
        return 0.0;
    }
    let user_set = normalized_set(user_ingredients);
    let recipe_set = normalized_set(recipe_ingredients);
    let matches = user_set.intersection(&recipe_set).count();
    matches as f64 / recipe_set.len() as f64
}
