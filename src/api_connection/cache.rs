use log::trace;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use crate::config::UsdaConfig;
use crate::error::ConfigError;
use crate::matching::normalizer::normalize;
use crate::nutritional_matcher::{FoodMatch, NutrientLookup, NutrientProfile};

/// Bounded LRU memoization in front of another lookup.
///
/// Searches are keyed by normalized ingredient name, nutrition by food id.
/// Only successful answers are stored, so a timeout is retried on the next
/// request. Locks are released before awaiting the inner lookup.
pub struct CachedLookup<L> {
    inner: L,
    search_cache: Mutex<LruCache<String, Vec<FoodMatch>>>,
    nutrition_cache: Mutex<LruCache<u64, Option<NutrientProfile>>>,
}

impl<L: NutrientLookup> CachedLookup<L> {
    pub fn new(inner: L, search_capacity: usize, nutrition_capacity: usize) -> Result<Self, ConfigError> {
        let search_capacity = NonZeroUsize::new(search_capacity)
            .ok_or(ConfigError::ZeroCapacity("search_cache_capacity"))?;
        let nutrition_capacity = NonZeroUsize::new(nutrition_capacity)
            .ok_or(ConfigError::ZeroCapacity("nutrition_cache_capacity"))?;
        Ok(Self {
            inner,
            search_cache: Mutex::new(LruCache::new(search_capacity)),
            nutrition_cache: Mutex::new(LruCache::new(nutrition_capacity)),
        })
    }

    pub fn from_config(inner: L, config: &UsdaConfig) -> Result<Self, ConfigError> {
        Self::new(inner, config.search_cache_capacity, config.nutrition_cache_capacity)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn cached_searches(&self) -> usize {
        self.search_cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn cached_profiles(&self) -> usize {
        self.nutrition_cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<L: NutrientLookup> NutrientLookup for CachedLookup<L> {
    async fn search_food(&self, name: &str) -> anyhow::Result<Vec<FoodMatch>> {
        let key = normalize(name);
        let hit = self
            .search_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(foods) = hit {
            trace!("Search cache hit for '{}'", key);
            return Ok(foods);
        }

        let foods = self.inner.search_food(name).await?;
        self.search_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, foods.clone());
        Ok(foods)
    }

    async fn get_nutrition(&self, food_id: u64) -> anyhow::Result<Option<NutrientProfile>> {
        let hit = self
            .nutrition_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&food_id)
            .copied();
        if let Some(profile) = hit {
            trace!("Nutrition cache hit for food {}", food_id);
            return Ok(profile);
        }

        let profile = self.inner.get_nutrition(food_id).await?;
        self.nutrition_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(food_id, profile);
        Ok(profile)
    }
}
