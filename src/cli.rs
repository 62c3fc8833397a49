use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ingredient_fusion::DetectedIngredient;
use crate::recipe_store::RecipeFilters;
use crate::recommender::RecommendMethod;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend recipes for a confidence-ordered ingredient list
    Recommend {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Ingredients, primary first (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        ingredients: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = RecommendMethod::Hybrid)]
        method: RecommendMethod,
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Estimate a recipe's nutrition from its ingredients
    Nutrition {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Recipe name (case-insensitive)
        #[arg(short, long)]
        recipe: String,
        /// Offline nutrient table instead of USDA FoodData Central
        #[arg(long)]
        nutrient_csv: Option<PathBuf>,
    },
    /// Show the per-ingredient gram conversion of a recipe
    Convert {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(short, long)]
        recipe: String,
    },
    /// List the cuisines and dietary types present in the corpus
    FilterOptions {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Merge classifier detections with OCR text into an ingredient list
    Fuse {
        /// Detection as `name:confidence`, repeatable
        #[arg(short, long = "detection", value_parser = parse_detection)]
        detections: Vec<DetectedIngredient>,
        #[arg(long)]
        ocr_text: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// JSON array of recipes
    #[arg(long, default_value = "recipes.json")]
    pub recipes: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub cuisine: Option<String>,
    #[arg(long)]
    pub dietary_type: Option<String>,
    /// Minutes
    #[arg(long)]
    pub max_cooking_time: Option<u32>,
}

impl From<FilterArgs> for RecipeFilters {
    fn from(args: FilterArgs) -> Self {
        RecipeFilters {
            cuisine: args.cuisine,
            dietary_type: args.dietary_type,
            max_cooking_time: args.max_cooking_time,
        }
    }
}

fn parse_detection(value: &str) -> Result<DetectedIngredient, String> {
    let (name, confidence) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected name:confidence, got '{}'", value))?;
    let confidence: f64 = confidence
        .trim()
        .parse()
        .map_err(|e| format!("invalid confidence '{}': {}", confidence, e))?;
    Ok(DetectedIngredient::new(name.trim(), confidence))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_args() {
        let cli = Cli::try_parse_from([
            "recipe_recommender",
            "recommend",
            "--ingredients",
            "banana,milk",
            "--method",
            "content",
            "--cuisine",
            "Thai",
        ])
        .unwrap();
        match cli.command {
            Command::Recommend {
                ingredients,
                method,
                filters,
                corpus,
                top_n,
            } => {
                assert_eq!(ingredients, vec!["banana", "milk"]);
                assert_eq!(method, RecommendMethod::Content);
                assert_eq!(filters.cuisine.as_deref(), Some("Thai"));
                assert_eq!(corpus.recipes, PathBuf::from("recipes.json"));
                assert!(top_n.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_fuse_detections() {
        let cli = Cli::try_parse_from([
            "recipe_recommender",
            "fuse",
            "-d",
            "banana:0.8",
            "--detection",
            "red onion: 0.4",
        ])
        .unwrap();
        match cli.command {
            Command::Fuse { detections, ocr_text } => {
                assert_eq!(detections[1], DetectedIngredient::new("red onion", 0.4));
                assert!(ocr_text.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(parse_detection("banana").is_err());
        assert!(parse_detection("banana:high").is_err());
    }
}
