use serde::{Deserialize, Serialize};

use crate::nutritional_matcher::{round_half_even, FoodMatch, NutrientProfile};

/// FoodData Central datasets searched; branded and survey foods are skipped.
pub const SEARCH_DATA_TYPES: &[&str] = &["Foundation", "SR Legacy"];

pub fn search_url(base_url: &str) -> String {
    format!("{}/foods/search", base_url.trim_end_matches('/'))
}

pub fn food_url(base_url: &str, food_id: u64) -> String {
    format!("{}/food/{}", base_url.trim_end_matches('/'), food_id)
}

/// Raw whole foods are preferred over prepared dishes.
pub fn search_query(name: &str) -> String {
    format!("{} raw", name)
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodSearchParams {
    pub query: String,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "dataType")]
    pub data_type: String,
}

impl FoodSearchParams {
    pub fn new(name: &str, page_size: u32) -> Self {
        Self {
            query: search_query(name),
            page_size,
            data_type: SEARCH_DATA_TYPES.join(","),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchResultFood {
    #[serde(rename = "fdcId")]
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "dataType", default)]
    pub data_type: Option<String>,
}

impl From<SearchResultFood> for FoodMatch {
    fn from(food: SearchResultFood) -> Self {
        FoodMatch {
            id: food.fdc_id,
            description: food.description,
            data_type: food.data_type,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodSearchResponse {
    #[serde(default)]
    pub foods: Vec<SearchResultFood>,
    #[serde(rename = "totalHits", default)]
    pub total_hits: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Nutrient {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "unitName", default)]
    pub unit_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient: Nutrient,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodDetailsResponse {
    #[serde(rename = "fdcId", default)]
    pub fdc_id: Option<u64>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "foodNutrients", default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

impl FoodDetailsResponse {
    /// Per-100 g profile from the nutrient records. The first record of each
    /// kind wins, so later energy records (kJ, Atwater variants) are ignored.
    /// Returns `None` when no recognized nutrient carries an amount.
    pub fn nutrient_profile(&self) -> Option<NutrientProfile> {
        let mut calories = None;
        let mut protein = None;
        let mut carbs = None;
        let mut fat = None;

        for record in &self.food_nutrients {
            let Some(amount) = record.amount else {
                continue;
            };
            let name = record.nutrient.name.to_lowercase();
            let slot = if name.contains("energy") {
                &mut calories
            } else if name.contains("protein") {
                &mut protein
            } else if name.contains("carbohydrate") {
                &mut carbs
            } else if name.contains("total lipid") || name.contains("fat, total") {
                &mut fat
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(round_half_even(amount, 1));
            }
        }

        if calories.is_none() && protein.is_none() && carbs.is_none() && fat.is_none() {
            return None;
        }
        Some(NutrientProfile {
            calories: calories.unwrap_or(0.0),
            protein: protein.unwrap_or(0.0),
            carbs: carbs.unwrap_or(0.0),
            fat: fat.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_and_params() {
        assert_eq!(
            search_url("https://api.nal.usda.gov/fdc/v1/"),
            "https://api.nal.usda.gov/fdc/v1/foods/search"
        );
        assert_eq!(food_url("http://x", 171287), "http://x/food/171287");

        let params = FoodSearchParams::new("egg", 10);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["query"], "egg raw");
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["dataType"], "Foundation,SR Legacy");
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"totalHits": 2, "foods": [
            {"fdcId": 171287, "description": "Egg, whole, raw, fresh", "dataType": "SR Legacy"},
            {"fdcId": 1, "description": "Egg, yolk, dried"}
        ]}"#;
        let response: FoodSearchResponse = serde_json::from_str(body).unwrap();
        let matches: Vec<FoodMatch> = response.foods.into_iter().map(FoodMatch::from).collect();
        assert_eq!(matches[0].id, 171287);
        assert_eq!(matches[0].data_type.as_deref(), Some("SR Legacy"));
        assert!(matches[1].data_type.is_none());
    }

    #[test]
    fn test_nutrient_profile_first_record_wins() {
        let body = r#"{"fdcId": 171287, "description": "Egg, whole, raw, fresh", "foodNutrients": [
            {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 143.04},
            {"nutrient": {"name": "Energy", "unitName": "kJ"}, "amount": 599.0},
            {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 12.56},
            {"nutrient": {"name": "Total lipid (fat)", "unitName": "g"}, "amount": 9.51},
            {"nutrient": {"name": "Carbohydrate, by difference", "unitName": "g"}, "amount": 0.72},
            {"nutrient": {"name": "Calcium, Ca", "unitName": "mg"}, "amount": 56.0}
        ]}"#;
        let details: FoodDetailsResponse = serde_json::from_str(body).unwrap();
        let profile = details.nutrient_profile().unwrap();
        assert_eq!(profile.calories, 143.0);
        assert_eq!(profile.protein, 12.6);
        assert_eq!(profile.fat, 9.5);
        assert_eq!(profile.carbs, 0.7);
    }

    #[test]
    fn test_nutrient_profile_missing_data() {
        let body = r#"{"foodNutrients": [
            {"nutrient": {"name": "Energy"}},
            {"nutrient": {"name": "Vitamin C"}, "amount": 8.7}
        ]}"#;
        let details: FoodDetailsResponse = serde_json::from_str(body).unwrap();
        assert!(details.nutrient_profile().is_none());

        let body = r#"{"foodNutrients": [{"nutrient": {"name": "Protein"}, "amount": 1.1}]}"#;
        let details: FoodDetailsResponse = serde_json::from_str(body).unwrap();
        let profile = details.nutrient_profile().unwrap();
        assert_eq!(profile.calories, 0.0);
        assert_eq!(profile.protein, 1.1);
    }

    #[test]
    fn test_nutrient_amount_ties_round_to_even() {
        let body = r#"{"foodNutrients": [
            {"nutrient": {"name": "Protein"}, "amount": 0.25},
            {"nutrient": {"name": "Total lipid (fat)"}, "amount": 0.75}
        ]}"#;
        let details: FoodDetailsResponse = serde_json::from_str(body).unwrap();
        let profile = details.nutrient_profile().unwrap();
        assert_eq!(profile.protein, 0.2);
        assert_eq!(profile.fat, 0.8);
    }
}
