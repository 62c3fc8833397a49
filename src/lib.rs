pub mod api_connection;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingredient_fusion;
pub mod matching;
pub mod nutrient_table;
pub mod nutritional_matcher;
pub mod recipe;
pub mod recipe_aggregator;
pub mod recipe_converter;
pub mod recipe_store;
pub mod recommender;
pub mod search;
pub mod units;
