use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use log::{debug, info};
use std::path::Path;

use crate::matching::fuzzy::FuzzyMatcher;
use crate::matching::normalizer::normalize;
use crate::nutritional_matcher::{filter_food_candidates, FoodMatch, NutrientLookup, NutrientProfile};

const NAME_COL: &str = "Name";
const KCAL_COL: &str = "kcal/100g";
const PROTEIN_COL: &str = "Protein (g/100g)";
const CARB_COL: &str = "Carbohydrate (g/100g)";
const FAT_COL: &str = "Fat (g/100g)";

fn parse_optional_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientRow {
    pub name: String,
    pub kcal_per_100g: Option<f64>,
    pub protein_g_per_100g: Option<f64>,
    pub carbohydrate_g_per_100g: Option<f64>,
    pub fat_g_per_100g: Option<f64>,
}

impl NutrientRow {
    fn profile(&self) -> Option<NutrientProfile> {
        let values = [
            self.kcal_per_100g,
            self.protein_g_per_100g,
            self.carbohydrate_g_per_100g,
            self.fat_g_per_100g,
        ];
        if values.iter().all(Option::is_none) {
            return None;
        }
        Some(NutrientProfile {
            calories: self.kcal_per_100g.unwrap_or(0.0),
            protein: self.protein_g_per_100g.unwrap_or(0.0),
            carbs: self.carbohydrate_g_per_100g.unwrap_or(0.0),
            fat: self.fat_g_per_100g.unwrap_or(0.0),
        })
    }
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| anyhow!("Column '{}' not found", column))
}

pub fn load_nutrient_rows(csv_path: &Path) -> Result<Vec<NutrientRow>> {
    if !csv_path.exists() {
        return Err(anyhow!("Nutrient CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open nutrient CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let name_idx = column_index(&headers, NAME_COL)?;
    let kcal_idx = column_index(&headers, KCAL_COL)?;
    let protein_idx = column_index(&headers, PROTEIN_COL)?;
    let carb_idx = column_index(&headers, CARB_COL)?;
    let fat_idx = column_index(&headers, FAT_COL)?;

    let mut rows = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let name = record.get(name_idx).unwrap_or_default().trim().to_string();
        if name.is_empty() {
            continue;
        }

        rows.push(NutrientRow {
            name,
            kcal_per_100g: record.get(kcal_idx).and_then(parse_optional_f64),
            protein_g_per_100g: record.get(protein_idx).and_then(parse_optional_f64),
            carbohydrate_g_per_100g: record.get(carb_idx).and_then(parse_optional_f64),
            fat_g_per_100g: record.get(fat_idx).and_then(parse_optional_f64),
        });
    }

    if rows.is_empty() {
        return Err(anyhow!("No valid nutrient data loaded from {:?}", csv_path));
    }
    Ok(rows)
}

/// Offline [`NutrientLookup`] over a per-100 g nutrient CSV. Food ids are row
/// positions in the loaded table.
#[derive(Debug, Clone)]
pub struct CsvNutrientTable {
    rows: Vec<NutrientRow>,
    matcher: FuzzyMatcher,
}

impl CsvNutrientTable {
    pub fn load(csv_path: &Path, matcher: FuzzyMatcher) -> Result<Self> {
        let rows = load_nutrient_rows(csv_path)?;
        info!("Loaded {} nutrient rows from {:?}", rows.len(), csv_path);
        Ok(Self::from_rows(rows, matcher))
    }

    pub fn from_rows(rows: Vec<NutrientRow>, matcher: FuzzyMatcher) -> Self {
        Self { rows, matcher }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fuzzy-matching rows, exact name matches first, table order otherwise.
    pub fn find(&self, name: &str) -> Vec<FoodMatch> {
        let query = normalize(name);
        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (id, row) in self.rows.iter().enumerate() {
            let candidate = FoodMatch {
                id: id as u64,
                description: row.name.clone(),
                data_type: None,
            };
            if normalize(&row.name) == query && !query.is_empty() {
                exact.push(candidate);
            } else if self.matcher.matches(&query, &row.name) {
                partial.push(candidate);
            }
        }
        exact.extend(partial);
        debug!("Nutrient table search for '{}' found {} rows", name, exact.len());
        filter_food_candidates(exact)
    }
}

impl NutrientLookup for CsvNutrientTable {
    async fn search_food(&self, name: &str) -> Result<Vec<FoodMatch>> {
        Ok(self.find(name))
    }

    async fn get_nutrition(&self, food_id: u64) -> Result<Option<NutrientProfile>> {
        Ok(usize::try_from(food_id)
            .ok()
            .and_then(|index| self.rows.get(index))
            .and_then(NutrientRow::profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{},{},{}", NAME_COL, KCAL_COL, PROTEIN_COL, CARB_COL, FAT_COL)?;
        writeln!(file, "Egg whole raw,155,13,1.1,11")?;
        writeln!(file, "Egg,143,12.6,0.7,9.5")?;
        writeln!(file, "Banana,,1.1,22.8,0.3")?; // Missing kcal
        writeln!(file, ",10,10,10,10")?; // Empty name
        writeln!(file, "Egg yolk dried,600,30,3,55")?;
        writeln!(file, "Mystery,text,,,")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_rows() -> Result<()> {
        let file = create_test_csv_file()?;
        let rows = load_nutrient_rows(file.path())?;
        assert_eq!(rows.len(), 5);

        let banana = rows.iter().find(|r| r.name == "Banana").unwrap();
        assert_eq!(banana.kcal_per_100g, None);
        assert_eq!(banana.carbohydrate_g_per_100g, Some(22.8));
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{},{}", NAME_COL, PROTEIN_COL, CARB_COL, FAT_COL)?;
        writeln!(file, "Apple,0.3,13.8,0.2")?;
        file.flush()?;

        let result = load_nutrient_rows(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(&format!("Column '{}' not found", KCAL_COL)));
        Ok(())
    }

    #[test]
    fn test_headers_only_and_missing_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{},{},{}", NAME_COL, KCAL_COL, PROTEIN_COL, CARB_COL, FAT_COL)?;
        file.flush()?;
        let result = load_nutrient_rows(file.path());
        assert!(result.unwrap_err().to_string().contains("No valid nutrient data loaded"));

        let result = load_nutrient_rows(Path::new("this_file_does_not_exist.csv"));
        assert!(result.unwrap_err().to_string().contains("Nutrient CSV file not found"));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_prefers_exact_and_skips_processed() -> Result<()> {
        let file = create_test_csv_file()?;
        let table = CsvNutrientTable::load(file.path(), FuzzyMatcher::default())?;

        let foods = table.search_food("egg").await?;
        let names: Vec<&str> = foods.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(names, vec!["Egg", "Egg whole raw"]);

        let profile = table.get_nutrition(foods[0].id).await?.unwrap();
        assert_eq!(profile.calories, 143.0);
        assert!(table.search_food("beef").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_nutrition_missing_values() -> Result<()> {
        let file = create_test_csv_file()?;
        let table = CsvNutrientTable::load(file.path(), FuzzyMatcher::default())?;

        let banana = table.find("banana");
        let profile = table.get_nutrition(banana[0].id).await?.unwrap();
        assert_eq!(profile.calories, 0.0);
        assert_eq!(profile.carbs, 22.8);

        let mystery = table.find("mystery");
        assert!(table.get_nutrition(mystery[0].id).await?.is_none());
        assert!(table.get_nutrition(999).await?.is_none());
        Ok(())
    }
}
