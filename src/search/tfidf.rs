//! TF-IDF vectorizer over a small in-memory corpus.
//!
//! Tokens are lowercase runs of two or more word characters with English stop
//! words removed. Weights use raw term counts and smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`; every row is L2-normalized so cosine
//! similarity reduces to a dot product.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::stop_words::is_stop_word;

lazy_static! {
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"\b\w\w+\b").expect("Token pattern should be valid");
}

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

/// Vocabulary and idf weights learned from a corpus, plus its document vectors.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let mut seen = HashSet::new();
            for token in tokens {
                *corpus_counts.entry(token.as_str()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Keep the most frequent terms; ties go to the alphabetically smaller term.
        let mut terms: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_features);

        let mut kept: Vec<&str> = terms.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();
        let vocabulary: BTreeMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        debug!(
            "TF-IDF fitted on {} documents, vocabulary size {}",
            documents.len(),
            vocabulary.len()
        );

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&idx) = vocabulary.get(token) {
                        row[idx] += idf[idx];
                    }
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        TfidfMatrix {
            vocabulary,
            idf,
            rows,
        }
    }
}

fn l2_normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity; zero when either vector is all zeros.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_single_chars() {
        assert_eq!(tokenize("The Banana and a 2 eggs"), vec!["banana", "eggs"]);
    }

    #[test]
    fn test_tokenize_drops_number_words() {
        assert_eq!(
            tokenize("Three Cheese pasta with two eggs, top fire side"),
            vec!["cheese", "pasta", "eggs"]
        );
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["banana banana milk", "banana oat", "milk"];
        let matrix = TfidfVectorizer::new(2).fit_transform(&docs);
        let terms: Vec<&String> = matrix.vocabulary.keys().collect();
        assert_eq!(terms, vec!["banana", "milk"]);
        assert!(matrix.rows[1][0] > 0.0);
    }

    #[test]
    fn test_rows_are_unit_length_or_zero() {
        let docs = ["banana bread", "the of and", "beef stew beef"];
        let matrix = TfidfVectorizer::new(1000).fit_transform(&docs);
        let norm = |row: &Vec<f64>| row.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm(&matrix.rows[0]) - 1.0).abs() < 1e-9);
        assert_eq!(norm(&matrix.rows[1]), 0.0);
        assert!((norm(&matrix.rows[2]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_smoothed_idf() {
        let docs = ["banana", "banana milk"];
        let matrix = TfidfVectorizer::new(1000).fit_transform(&docs);
        let banana = matrix.vocabulary["banana"];
        let milk = matrix.vocabulary["milk"];
        assert!((matrix.idf[banana] - 1.0).abs() < 1e-12);
        assert!((matrix.idf[milk] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
