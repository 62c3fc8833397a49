use serde::{Deserialize, Deserializer, Serialize};

use crate::recipe_aggregator::NutritionTotal;

/// Free-text or numeric ingredient quantity as stored with a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Text form fed to the quantity parser; numbers render without a trailing `.0`.
    pub fn as_text(&self) -> String {
        match self {
            Quantity::Number(value) => value.to_string(),
            Quantity::Text(text) => text.clone(),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Text("1".to_string())
    }
}

impl From<&str> for Quantity {
    fn from(text: &str) -> Self {
        Quantity::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIngredient")]
pub struct IngredientEntry {
    pub name: String,
    pub quantity: Quantity,
    /// Often empty or a placeholder such as "unit"; see [`crate::units`]
    pub unit: String,
}

impl IngredientEntry {
    pub fn new(name: &str, quantity: impl Into<Quantity>, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.into(),
            unit: unit.to_string(),
        }
    }

    /// Entry carrying only a name, as produced by string-only ingredient lists.
    pub fn named(name: &str) -> Self {
        Self::new(name, Quantity::default(), "")
    }
}

// Stored corpora mix bare ingredient names with full entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIngredient {
    Name(String),
    Entry {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        quantity: Option<Quantity>,
        #[serde(default)]
        unit: Option<String>,
    },
}

impl From<RawIngredient> for IngredientEntry {
    fn from(raw: RawIngredient) -> Self {
        match raw {
            RawIngredient::Name(name) => IngredientEntry::named(&name),
            RawIngredient::Entry {
                name,
                quantity,
                unit,
            } => IngredientEntry {
                name: name.unwrap_or_default(),
                quantity: quantity.unwrap_or_default(),
                unit: unit.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub dietary_type: Option<String>,
    /// Minutes
    #[serde(default)]
    pub cooking_time: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default, deserialize_with = "string_or_lines")]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionTotal>,
}

impl Recipe {
    pub fn new(name: &str, ingredients: Vec<IngredientEntry>) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            cuisine: None,
            dietary_type: None,
            cooking_time: None,
            ingredients,
            instructions: Vec::new(),
            nutrition: None,
        }
    }

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|ing| ing.name.as_str())
    }
}

fn string_or_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Instructions {
        Text(String),
        Steps(Vec<String>),
    }

    Ok(match Option::<Instructions>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Instructions::Steps(steps)) => steps,
        Some(Instructions::Text(text)) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Working copy of a recipe annotated with the scores of one recommendation call.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_score: Option<f64>,
}

impl ScoredRecipe {
    pub fn name(&self) -> &str {
        &self.recipe.name
    }
}

impl From<Recipe> for ScoredRecipe {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe,
            match_score: None,
            similarity_score: None,
            hybrid_score: None,
        }
    }
}
