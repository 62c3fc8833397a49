pub mod fuzzy;
pub mod match_score;
pub mod normalizer;

pub use fuzzy::{exact_match, fuzzy_match_ingredient, partial_match, FuzzyMatcher};
pub use match_score::{calculate_match_score, match_details, rank_recipes_by_ingredients, MatchResult};
pub use normalizer::{normalize, word_set};
