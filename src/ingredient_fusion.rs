//! # Ingredient Fusion
//!
//! Merges image-classifier detections with ingredient names read from OCR
//! text (a package label, a handwritten list) into the confidence-ordered
//! ingredient list the recommender takes, primary ingredient first.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::FusionConfig;

lazy_static! {
    static ref WORD_REGEX: Regex = Regex::new(r"[a-z]+").expect("Word pattern should be valid");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    pub confidence: f64,
}

impl DetectedIngredient {
    pub fn new(name: &str, confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            confidence,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Insertion-ordered confidence table; re-inserting a name keeps its first position.
#[derive(Default)]
struct ConfidenceTable {
    order: Vec<String>,
    confidences: HashMap<String, f64>,
}

impl ConfidenceTable {
    fn set(&mut self, name: String, confidence: f64) {
        if !self.confidences.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.confidences.insert(name, confidence);
    }

    fn get(&self, name: &str) -> Option<f64> {
        self.confidences.get(name).copied()
    }

    fn into_sorted(self) -> Vec<DetectedIngredient> {
        let mut merged: Vec<DetectedIngredient> = self
            .order
            .into_iter()
            .map(|name| {
                let confidence = self.confidences.get(&name).copied().unwrap_or(0.0);
                DetectedIngredient {
                    name,
                    confidence: round2(confidence),
                }
            })
            .collect();
        merged.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        merged
    }
}

/// Keeps detections above `min_confidence`, raises OCR-confirmed known
/// ingredients to at least `ocr_confidence`, and sorts by confidence.
pub fn combine_ingredients(
    detections: &[DetectedIngredient],
    ocr_text: Option<&str>,
    config: &FusionConfig,
) -> Vec<DetectedIngredient> {
    let mut table = ConfidenceTable::default();

    for detection in detections {
        let name = detection.name.trim().to_lowercase();
        if name.is_empty() || detection.confidence <= config.min_confidence {
            continue;
        }
        table.set(name, detection.confidence);
    }

    if let Some(text) = ocr_text {
        let text = text.to_lowercase();
        for word in WORD_REGEX.find_iter(&text).map(|m| m.as_str()) {
            if !config.known_ingredients.iter().any(|known| known == word) {
                continue;
            }
            let confidence = table
                .get(word)
                .map_or(config.ocr_confidence, |existing| existing.max(config.ocr_confidence));
            debug!("OCR text confirms '{}' at {:.2}", word, confidence);
            table.set(word.to_string(), confidence);
        }
    }

    table.into_sorted()
}

/// Ingredient names in confidence order, ready for the recommender.
pub fn ingredient_names(ingredients: &[DetectedIngredient]) -> Vec<String> {
    ingredients.iter().map(|i| i.name.clone()).collect()
}
