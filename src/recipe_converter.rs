use log::debug;
use serde::Serialize;

use crate::recipe::{IngredientEntry, Recipe};
use crate::units::quantity_parser::parse_quantity;
use crate::units::unit_converter::{convert_to_grams, ConversionSource};
use crate::units::unit_rules::Unit;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ConvertedIngredient {
    pub name: String,
    pub original_quantity: String,
    pub original_unit: String,
    pub magnitude: f64,
    pub effective_unit: Option<Unit>,
    pub quantity_grams: f64,
    pub conversion_source: ConversionSource,
}

/// Converts one stored ingredient to grams. Never fails; unparseable text
/// falls back to one item of 100 g.
pub fn convert_ingredient(ingredient: &IngredientEntry) -> ConvertedIngredient {
    let original_quantity = ingredient.quantity.as_text();
    let parsed = parse_quantity(&original_quantity);
    let conversion = convert_to_grams(parsed.magnitude, &ingredient.unit, &parsed.raw_text);

    debug!(
        "Converted '{}' ({} {}) to {} g via {:?}",
        ingredient.name, original_quantity, ingredient.unit, conversion.grams, conversion.source
    );

    ConvertedIngredient {
        name: ingredient.name.clone(),
        original_quantity,
        original_unit: ingredient.unit.clone(),
        magnitude: parsed.magnitude,
        effective_unit: conversion.effective_unit,
        quantity_grams: conversion.grams,
        conversion_source: conversion.source,
    }
}

pub fn convert_ingredients_to_grams(recipe: &Recipe) -> Vec<ConvertedIngredient> {
    recipe.ingredients.iter().map(convert_ingredient).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Quantity;

    #[test]
    fn test_breakdown_sources() {
        let recipe = Recipe::new(
            "Omelette",
            vec![
                IngredientEntry::new("egg", "2 large", "unit"),
                IngredientEntry::new("butter", Quantity::Number(1.0), "tbsp"),
                IngredientEntry::new("chives", "3", ""),
            ],
        );
        let converted = convert_ingredients_to_grams(&recipe);
        assert_eq!(converted.len(), 3);

        assert_eq!(converted[0].quantity_grams, 300.0);
        assert_eq!(converted[0].conversion_source, ConversionSource::SizeEstimate);
        assert_eq!(converted[0].effective_unit, None);

        assert_eq!(converted[1].original_quantity, "1");
        assert_eq!(converted[1].quantity_grams, 15.0);
        assert_eq!(converted[1].effective_unit, Some(Unit::Tablespoon));
        assert_eq!(converted[1].conversion_source, ConversionSource::Unit);

        assert_eq!(converted[2].quantity_grams, 300.0);
        assert_eq!(converted[2].conversion_source, ConversionSource::Default);
    }

    #[test]
    fn test_numeric_quantity_renders_plainly() {
        let converted = convert_ingredient(&IngredientEntry::new("flour", Quantity::Number(2.5), "cups"));
        assert_eq!(converted.original_quantity, "2.5");
        assert_eq!(converted.magnitude, 2.5);
        assert_eq!(converted.quantity_grams, 500.0);
    }

    #[test]
    fn test_serialized_source_names() {
        let converted = convert_ingredient(&IngredientEntry::new("garlic", "2 cloves", ""));
        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json["conversion_source"], "size_estimate");
        assert_eq!(json["quantity_grams"], 10.0);
    }
}
