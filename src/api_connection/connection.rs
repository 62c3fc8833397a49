use dotenv::dotenv;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use thiserror::Error;

use super::endpoints::{
    food_url, search_url, FoodDetailsResponse, FoodSearchParams, FoodSearchResponse,
};
use crate::config::UsdaConfig;
use crate::nutritional_matcher::{filter_food_candidates, FoodMatch, NutrientLookup, NutrientProfile};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

/// FoodData Central client. Every request carries the configured timeout.
#[derive(Debug, Clone)]
pub struct UsdaClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl UsdaClient {
    /// Reads the API key from the environment variable named in `config`,
    /// honouring a `.env` file.
    pub fn from_config(config: &UsdaConfig) -> Result<Self, ApiConnectionError> {
        dotenv().ok();
        let api_key = env::var(&config.api_key_env_var)
            .map_err(|_| ApiConnectionError::MissingApiKey(config.api_key_env_var.clone()))?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &UsdaConfig, api_key: String) -> Result<Self, ApiConnectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            page_size: config.page_size,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiConnectionError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if response.status().is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str::<T>(&body)?)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }

    pub async fn search_foods(&self, name: &str) -> Result<Vec<FoodMatch>, ApiConnectionError> {
        let params = FoodSearchParams::new(name, self.page_size);
        let query = [
            ("query", params.query),
            ("pageSize", params.page_size.to_string()),
            ("dataType", params.data_type),
        ];
        let response: FoodSearchResponse = self.get_json(&search_url(&self.base_url), &query).await?;
        debug!(
            "USDA search for '{}' returned {} foods",
            name,
            response.foods.len()
        );
        let candidates = response.foods.into_iter().map(FoodMatch::from).collect();
        Ok(filter_food_candidates(candidates))
    }

    pub async fn food_details(&self, food_id: u64) -> Result<FoodDetailsResponse, ApiConnectionError> {
        self.get_json(&food_url(&self.base_url, food_id), &[]).await
    }
}

impl NutrientLookup for UsdaClient {
    async fn search_food(&self, name: &str) -> anyhow::Result<Vec<FoodMatch>> {
        Ok(self.search_foods(name).await?)
    }

    async fn get_nutrition(&self, food_id: u64) -> anyhow::Result<Option<NutrientProfile>> {
        let details = self.food_details(food_id).await?;
        let profile = details.nutrient_profile();
        if profile.is_none() {
            warn!("USDA food {} ('{}') has no usable nutrient data", food_id, details.description);
        }
        Ok(profile)
    }
}
