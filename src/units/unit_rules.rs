//! # Unit Sniffing Rules
//!
//! When the stored unit is a placeholder the unit has to be read from the
//! quantity text itself. Rules are tried in table order and the first match
//! wins; the order matters because unit codes overlap ("mg" contains "g",
//! "ml" contains "l").

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Stored unit values that carry no information.
pub const PLACEHOLDER_UNITS: &[&str] = &["", "unit", "none", "item"];

/// Words that contain a "g" but must not be read as grams.
const GRAM_EXCLUSIONS: &[&str] = &["mg", "kg", "large", "orange", "egg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Milligram,
    Kilogram,
    Gram,
    Milliliter,
    Liter,
    Tablespoon,
    Teaspoon,
    Cup,
    Ounce,
    Pound,
    Pinch,
    Splash,
}

impl Unit {
    /// Resolves a non-placeholder stored unit through its spellings.
    pub fn from_alias(unit: &str) -> Option<Unit> {
        let unit = unit.trim().trim_end_matches('.').to_lowercase();
        let resolved = match unit.as_str() {
            "mg" | "milligram" | "milligrams" => Unit::Milligram,
            "kg" | "kgs" | "kilogram" | "kilograms" => Unit::Kilogram,
            "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => Unit::Gram,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Milliliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "tbsp" | "tbs" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
            "cup" | "cups" => Unit::Cup,
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "pinch" | "pinches" => Unit::Pinch,
            "splash" | "splashes" | "sprinkling" => Unit::Splash,
            _ => return None,
        };
        Some(resolved)
    }

    pub fn to_grams(self, magnitude: f64) -> f64 {
        match self {
            Unit::Milligram => magnitude / 1000.0,
            Unit::Kilogram => magnitude * 1000.0,
            Unit::Gram => magnitude,
            // water density
            Unit::Milliliter => magnitude,
            Unit::Liter => magnitude * 1000.0,
            Unit::Cup => magnitude * 200.0,
            Unit::Tablespoon => magnitude * 15.0,
            Unit::Teaspoon => magnitude * 5.0,
            Unit::Ounce => magnitude * 28.35,
            Unit::Pound => magnitude * 453.59,
            Unit::Pinch => 0.5,
            Unit::Splash => 2.0,
        }
    }
}

pub fn is_placeholder(unit: &str) -> bool {
    PLACEHOLDER_UNITS.contains(&unit.trim().to_lowercase().as_str())
}

lazy_static! {
    static ref BOUNDARY_REGEXES: HashMap<&'static str, Regex> = ["mg", "kg", "g", "ml", "l", "oz", "lb"]
        .iter()
        .map(|code| (*code, boundary_regex(code).expect("Unit boundary pattern should be valid")))
        .collect();
}

fn boundary_regex(code: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?:^|\d|\s){}(?:$|\s|\b)", regex::escape(code)))
}

/// True if `code` appears as a unit token: at the start of the text or right
/// after a digit or whitespace, and followed by the end, whitespace or a word
/// boundary. Keeps "l" in "salt" and "g" in "garlic" from matching.
pub fn has_unit(code: &str, text: &str) -> bool {
    match BOUNDARY_REGEXES.get(code) {
        Some(re) => re.is_match(text),
        None => boundary_regex(code).map(|re| re.is_match(text)).unwrap_or(false),
    }
}

/// One entry of the sniffing cascade.
pub struct UnitRule {
    pub unit: Unit,
    pub applies: fn(&str) -> bool,
}

fn is_milligram(text: &str) -> bool {
    has_unit("mg", text)
}

fn is_kilogram(text: &str) -> bool {
    has_unit("kg", text)
}

fn is_gram(text: &str) -> bool {
    (has_unit("g", text) || text.contains("grams"))
        && !GRAM_EXCLUSIONS.iter().any(|word| text.contains(word))
}

fn is_milliliter(text: &str) -> bool {
    has_unit("ml", text)
}

fn is_liter(text: &str) -> bool {
    has_unit("l", text) && !text.contains("ml")
}

fn is_tablespoon(text: &str) -> bool {
    text.contains("tbsp") || text.contains("tablespoon")
}

fn is_teaspoon(text: &str) -> bool {
    text.contains("tsp") || text.contains("teaspoon")
}

fn is_cup(text: &str) -> bool {
    text.contains("cup")
}

fn is_ounce(text: &str) -> bool {
    has_unit("oz", text) || text.contains("ounce")
}

fn is_pound(text: &str) -> bool {
    has_unit("lb", text) || text.contains("pound")
}

fn is_pinch(text: &str) -> bool {
    text.contains("pinch")
}

fn is_splash(text: &str) -> bool {
    text.contains("splash") || text.contains("sprinkling")
}

pub const UNIT_RULES: &[UnitRule] = &[
    UnitRule { unit: Unit::Milligram, applies: is_milligram },
    UnitRule { unit: Unit::Kilogram, applies: is_kilogram },
    UnitRule { unit: Unit::Gram, applies: is_gram },
    UnitRule { unit: Unit::Milliliter, applies: is_milliliter },
    UnitRule { unit: Unit::Liter, applies: is_liter },
    UnitRule { unit: Unit::Tablespoon, applies: is_tablespoon },
    UnitRule { unit: Unit::Teaspoon, applies: is_teaspoon },
    UnitRule { unit: Unit::Cup, applies: is_cup },
    UnitRule { unit: Unit::Ounce, applies: is_ounce },
    UnitRule { unit: Unit::Pound, applies: is_pound },
    UnitRule { unit: Unit::Pinch, applies: is_pinch },
    UnitRule { unit: Unit::Splash, applies: is_splash },
];

/// First rule matching the lowercase quantity text.
pub fn sniff_unit(raw_text: &str) -> Option<Unit> {
    UNIT_RULES
        .iter()
        .find(|rule| (rule.applies)(raw_text))
        .map(|rule| rule.unit)
}

impl Unit {
    /// Non-placeholder stored unit: exact spelling first, then the rule
    /// table for decorated values like "heaped tbsp". The litre rule is
    /// skipped there, so a stray "l" in "cloves" stays unresolved.
    pub fn from_stored(unit: &str) -> Option<Unit> {
        if let Some(resolved) = Unit::from_alias(unit) {
            return Some(resolved);
        }
        let unit = unit.trim().to_lowercase();
        UNIT_RULES
            .iter()
            .filter(|rule| rule.unit != Unit::Liter)
            .find(|rule| (rule.applies)(&unit))
            .map(|rule| rule.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_unit_boundaries() {
        assert!(has_unit("g", "200g"));
        assert!(has_unit("g", "200 g flour"));
        assert!(has_unit("g", "g"));
        assert!(has_unit("g", "200g."));
        assert!(!has_unit("g", "2 cloves garlic"));
        assert!(!has_unit("l", "a pinch of salt"));
        assert!(has_unit("l", "1.5 l"));
    }

    #[test]
    fn test_gram_rule_exclusions() {
        assert!(is_gram("200g"));
        assert!(is_gram("200 grams"));
        assert!(!is_gram("1 large egg"));
        assert!(!is_gram("1 g orange zest"));
        assert!(!is_gram("500mg"));
    }

    #[test]
    fn test_liter_rule_excludes_ml() {
        assert!(is_liter("1 l"));
        assert!(!is_liter("1 l 250 ml"));
        assert!(is_milliliter("250 ml"));
    }

    #[test]
    fn test_spoon_rules() {
        assert!(is_tablespoon("2 tablespoons"));
        assert!(!is_tablespoon("1 tsp"));
        assert!(is_teaspoon("1 tsp"));
    }

    #[test]
    fn test_weight_rules() {
        assert!(is_ounce("4 oz"));
        assert!(is_ounce("4 ounces"));
        assert!(!is_ounce("4 ozone"));
        assert!(is_pound("1 lb"));
        assert!(is_pound("2 pounds"));
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(sniff_unit("500mg"), Some(Unit::Milligram));
        assert_eq!(sniff_unit("1 kg"), Some(Unit::Kilogram));
        assert_eq!(sniff_unit("200g"), Some(Unit::Gram));
        assert_eq!(sniff_unit("250 ml"), Some(Unit::Milliliter));
        assert_eq!(sniff_unit("1 cup milk"), Some(Unit::Cup));
        assert_eq!(sniff_unit("a pinch"), Some(Unit::Pinch));
        assert_eq!(sniff_unit("a sprinkling"), Some(Unit::Splash));
        assert_eq!(sniff_unit("1 large egg"), None);
        assert_eq!(sniff_unit("2 cloves garlic"), None);
        assert_eq!(sniff_unit("3"), None);
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(Unit::from_alias("Tablespoons"), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_alias("tsp."), Some(Unit::Teaspoon));
        assert_eq!(Unit::from_alias("cloves"), None);
        assert!(is_placeholder(" Unit "));
        assert!(!is_placeholder("g"));
    }

    #[test]
    fn test_decorated_stored_units() {
        assert_eq!(Unit::from_stored("heaped tbsp"), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_stored("Cup, packed"), Some(Unit::Cup));
        assert_eq!(Unit::from_stored("level teaspoon"), Some(Unit::Teaspoon));
        assert_eq!(Unit::from_stored("500 g tin"), Some(Unit::Gram));
        assert_eq!(Unit::from_stored("tablespoons"), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_stored("cloves"), None);
        assert_eq!(Unit::from_stored("bunches"), None);
        assert_eq!(Unit::from_stored("small bottle"), None);
    }

    #[test]
    fn test_fixed_amount_units_ignore_magnitude() {
        assert_eq!(Unit::Pinch.to_grams(3.0), 0.5);
        assert_eq!(Unit::Splash.to_grams(10.0), 2.0);
        assert_eq!(Unit::Ounce.to_grams(2.0), 56.7);
    }
}
