use log::debug;

use super::tfidf::{cosine_similarity, TfidfVectorizer};
use crate::config::DEFAULT_MAX_FEATURES;
use crate::recipe::{Recipe, ScoredRecipe};

/// Bag-of-words document for a recipe: name, ingredient names, cuisine, dietary type.
pub fn recipe_document(recipe: &Recipe) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(recipe.ingredients.len() + 3);
    if !recipe.name.is_empty() {
        parts.push(&recipe.name);
    }
    parts.extend(recipe.ingredient_names());
    if let Some(cuisine) = recipe.cuisine.as_deref() {
        parts.push(cuisine);
    }
    if let Some(dietary_type) = recipe.dietary_type.as_deref() {
        parts.push(dietary_type);
    }
    parts.join(" ")
}

/// Ranks recipes by TF-IDF cosine similarity to the user's ingredient list.
#[derive(Debug, Clone)]
pub struct ContentSimilarityRanker {
    vectorizer: TfidfVectorizer,
}

impl Default for ContentSimilarityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl ContentSimilarityRanker {
    pub fn new(max_features: usize) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(max_features),
        }
    }

    /// Writes `similarity_score` onto every recipe, in place, without reordering.
    pub fn annotate<S: AsRef<str>>(&self, user_ingredients: &[S], recipes: &mut [ScoredRecipe]) {
        if recipes.is_empty() {
            return;
        }
        let query = user_ingredients
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        let mut corpus = Vec::with_capacity(recipes.len() + 1);
        corpus.push(query);
        corpus.extend(recipes.iter().map(|r| recipe_document(&r.recipe)));

        let matrix = self.vectorizer.fit_transform(&corpus);
        let query_vector = &matrix.rows[0];
        for (scored, row) in recipes.iter_mut().zip(&matrix.rows[1..]) {
            scored.similarity_score = Some(cosine_similarity(query_vector, row));
        }
        debug!("Computed content similarity for {} recipes", recipes.len());
    }

    /// Annotates, sorts descending by similarity (stable) and keeps `top_n`.
    pub fn rank<S: AsRef<str>>(
        &self,
        user_ingredients: &[S],
        mut recipes: Vec<ScoredRecipe>,
        top_n: usize,
    ) -> Vec<ScoredRecipe> {
        self.annotate(user_ingredients, &mut recipes);
        recipes.sort_by(|a, b| {
            b.similarity_score
                .unwrap_or(0.0)
                .total_cmp(&a.similarity_score.unwrap_or(0.0))
        });
        recipes.truncate(top_n);
        recipes
    }

    pub fn content_based_filtering<S: AsRef<str>>(
        &self,
        user_ingredients: &[S],
        recipes: &[Recipe],
        top_n: usize,
    ) -> Vec<ScoredRecipe> {
        let scored = recipes.iter().cloned().map(ScoredRecipe::from).collect();
        self.rank(user_ingredients, scored, top_n)
    }
}
