use log::trace;
use serde::Serialize;

use super::unit_rules::{is_placeholder, sniff_unit, Unit};

/// Grams assumed per item when only a size word is known.
const SIZE_ESTIMATES: &[(&str, f64)] = &[
    ("large", 150.0),
    ("medium", 100.0),
    ("small", 50.0),
    ("clove", 5.0),
    ("slice", 25.0),
];

const DEFAULT_ITEM_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSource {
    /// A unit was resolved from the stored unit or the quantity text
    Unit,
    SizeEstimate,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GramConversion {
    pub effective_unit: Option<Unit>,
    pub grams: f64,
    pub source: ConversionSource,
}

/// Resolves the effective unit: sniffed from the text for placeholder units,
/// read from the stored unit otherwise.
pub fn effective_unit(stored_unit: &str, raw_text: &str) -> Option<Unit> {
    if is_placeholder(stored_unit) {
        sniff_unit(raw_text)
    } else {
        Unit::from_stored(stored_unit)
    }
}

pub fn convert_to_grams(magnitude: f64, stored_unit: &str, raw_text: &str) -> GramConversion {
    if let Some(unit) = effective_unit(stored_unit, raw_text) {
        return GramConversion {
            effective_unit: Some(unit),
            grams: unit.to_grams(magnitude),
            source: ConversionSource::Unit,
        };
    }

    let mut text = raw_text.to_lowercase();
    if !is_placeholder(stored_unit) {
        text.push(' ');
        text.push_str(&stored_unit.trim().to_lowercase());
    }

    let (grams, source) = match SIZE_ESTIMATES.iter().find(|(word, _)| text.contains(word)) {
        Some((word, per_item)) => {
            trace!("Estimating '{}' as {} g per {}", text, per_item, word);
            (magnitude * per_item, ConversionSource::SizeEstimate)
        }
        None => (magnitude * DEFAULT_ITEM_GRAMS, ConversionSource::Default),
    };

    GramConversion {
        effective_unit: None,
        grams,
        source,
    }
}

pub fn to_grams(magnitude: f64, stored_unit: &str, raw_text: &str) -> f64 {
    convert_to_grams(magnitude, stored_unit, raw_text).grams
}
