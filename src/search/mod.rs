pub mod content_ranker;
pub mod stop_words;
pub mod tfidf;

pub use content_ranker::{recipe_document, ContentSimilarityRanker};
pub use tfidf::{cosine_similarity, TfidfVectorizer};
