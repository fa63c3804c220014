/// Nutrition data provider abstraction
///
/// The matching engine only needs per-item macro records for a free-text
/// ingredient description. Providers hide the vendor API and any caching.
use crate::{error::AppResult, models::NutritionItem};

pub mod calorie_ninjas;

pub use calorie_ninjas::CalorieNinjasProvider;

/// Trait for nutrition lookup providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NutritionLookup: Send + Sync {
    /// Looks up macro records for a description like "200 g chicken, 1 cup rice"
    ///
    /// An empty list means the provider recognised nothing in the query.
    async fn fetch_items(&self, query: &str) -> AppResult<Vec<NutritionItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
