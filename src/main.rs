use anyhow::{anyhow, Context, Result};
use log::info;
use serde::Serialize;

use recipe_recommender::api_connection::{CachedLookup, UsdaClient};
use recipe_recommender::cli::{parse_args, Command, CorpusArgs};
use recipe_recommender::config::AppConfig;
use recipe_recommender::ingredient_fusion::combine_ingredients;
use recipe_recommender::matching::FuzzyMatcher;
use recipe_recommender::nutrient_table::CsvNutrientTable;
use recipe_recommender::nutritional_matcher::NutrientLookup;
use recipe_recommender::recipe::Recipe;
use recipe_recommender::recipe_aggregator::aggregate_recipe;
use recipe_recommender::recipe_converter::convert_ingredients_to_grams;
use recipe_recommender::recipe_store::{JsonRecipeStore, RecipeFilters, RecipeRepository};
use recipe_recommender::recommender::Recommender;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

fn load_store(corpus: &CorpusArgs) -> Result<JsonRecipeStore> {
    JsonRecipeStore::load(&corpus.recipes)
        .with_context(|| format!("Failed to load recipe corpus from {:?}", corpus.recipes))
}

fn find_recipe(store: &JsonRecipeStore, name: &str) -> Result<Recipe> {
    let wanted = name.trim().to_lowercase();
    store
        .get_all_recipes()?
        .into_iter()
        .find(|r| r.name.to_lowercase() == wanted)
        .ok_or_else(|| anyhow!("No recipe named '{}' in the corpus", name))
}

async fn print_nutrition<L: NutrientLookup>(recipe: &Recipe, lookup: &L) -> Result<()> {
    let total = aggregate_recipe(recipe, lookup)
        .await
        .with_context(|| format!("Failed to estimate nutrition for '{}'", recipe.name))?;
    print_json(&total)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = parse_args();
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => AppConfig::default(),
    };
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Command::Recommend {
            corpus,
            ingredients,
            method,
            top_n,
            filters,
        } => {
            let store = load_store(&corpus)?;
            let filters = RecipeFilters::from(filters);
            let recipes = store.search(&filters)?;
            info!("{} recipes pass the filters", recipes.len());

            let recommender = Recommender::new(&config.recommender);
            let results = recommender.recommend(ingredients.as_slice(), &recipes, method, top_n)?;
            print_json(&results)?;
        }
        Command::Nutrition {
            corpus,
            recipe,
            nutrient_csv,
        } => {
            let store = load_store(&corpus)?;
            let recipe = find_recipe(&store, &recipe)?;
            match nutrient_csv {
                Some(path) => {
                    let matcher = FuzzyMatcher::new(config.recommender.fuzzy_threshold);
                    let table = CsvNutrientTable::load(&path, matcher)
                        .with_context(|| format!("Failed to load nutrient table from {:?}", path))?;
                    print_nutrition(&recipe, &table).await?;
                }
                None => {
                    let client = UsdaClient::from_config(&config.usda)
                        .context("Failed to create USDA FoodData Central client")?;
                    let lookup = CachedLookup::from_config(client, &config.usda)?;
                    print_nutrition(&recipe, &lookup).await?;
                }
            }
        }
        Command::Convert { corpus, recipe } => {
            let store = load_store(&corpus)?;
            let recipe = find_recipe(&store, &recipe)?;
            print_json(&convert_ingredients_to_grams(&recipe))?;
        }
        Command::FilterOptions { corpus } => {
            let store = load_store(&corpus)?;
            print_json(&store.filter_options()?)?;
        }
        Command::Fuse {
            detections,
            ocr_text,
        } => {
            let merged = combine_ingredients(&detections, ocr_text.as_deref(), &config.fusion);
            print_json(&merged)?;
        }
    }

    Ok(())
}
