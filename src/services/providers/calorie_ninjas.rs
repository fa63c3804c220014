/// CalorieNinjas nutrition API provider
///
/// API Flow:
/// 1. `GET /v1/nutrition?query=<description>` with the `X-Api-Key` header
/// 2. Response `{ "items": [ { "protein_g", "carbohydrates_total_g", "fat_total_g", ... } ] }`
///
/// Responses are cached in Redis keyed by the lowercased query.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{NutritionItem, NutritionResponse},
    services::providers::NutritionLookup,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct CalorieNinjasProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl CalorieNinjasProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, cache_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
            cache_ttl,
        }
    }

    fn nutrition_url(&self) -> String {
        format!("{}/v1/nutrition", self.api_url.trim_end_matches('/'))
    }

    async fn call_api(&self, query: &str) -> AppResult<Vec<NutritionItem>> {
        let response = self
            .http_client
            .get(self.nutrition_url())
            .header("X-Api-Key", &self.api_key)
            .query(&[("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                provider = "calorie_ninjas",
                "Nutrition API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "CalorieNinjas API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let items = parse_response(&response_text)?;

        tracing::info!(
            items = items.len(),
            provider = "calorie_ninjas",
            "Nutrition lookup completed"
        );

        Ok(items)
    }
}

/// Parses a response body into per-item records
fn parse_response(body: &str) -> AppResult<Vec<NutritionItem>> {
    let parsed: NutritionResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, response = %body, "Failed to deserialize CalorieNinjas response");
        AppError::ExternalApi(format!("Failed to parse CalorieNinjas response: {}", e))
    })?;
    Ok(parsed.items)
}

#[async_trait::async_trait]
impl NutritionLookup for CalorieNinjasProvider {
    async fn fetch_items(&self, query: &str) -> AppResult<Vec<NutritionItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Nutrition query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Nutrition(query.to_string()),
            self.cache_ttl,
            async move { self.call_api(query).await },
            keep_if = |items: &Vec<NutritionItem>| !items.is_empty()
        )
    }

    fn name(&self) -> &'static str {
        "calorie_ninjas"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::create_redis_client, models::NutritionTotals};
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn create_test_provider(api_url: &str) -> (CalorieNinjasProvider, crate::db::CacheWriterHandle) {
        provider_with_redis(api_url, "redis://127.0.0.1:1")
    }

    fn provider_with_redis(
        api_url: &str,
        redis_url: &str,
    ) -> (CalorieNinjasProvider, crate::db::CacheWriterHandle) {
        let client = create_redis_client(redis_url).unwrap();
        let (cache, handle) = Cache::new(client, Duration::from_millis(100));
        let provider =
            CalorieNinjasProvider::new(cache, "test_key".to_string(), api_url.to_string(), 60);
        (provider, handle)
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "items": [
                {
                    "name": "chicken",
                    "calories": 222.6,
                    "serving_size_g": 100.0,
                    "protein_g": 23.7,
                    "carbohydrates_total_g": 0.0,
                    "fat_total_g": 12.9
                },
                {
                    "name": "rice",
                    "protein_g": 2.7,
                    "carbohydrates_total_g": 28.4,
                    "fat_total_g": 0.3
                }
            ]
        }"#;

        let items = parse_response(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "chicken");
        assert_eq!(items[0].protein_g, Some(23.7));

        let totals = NutritionTotals::from_items(&items);
        assert!((totals.carbs - 28.4).abs() < 1e-9);
    }

    #[test]
    fn test_parse_response_without_items() {
        let items = parse_response("{}").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_response_malformed() {
        let result = parse_response("<html>rate limited</html>");
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_nutrition_url_trims_trailing_slash() {
        let (provider, _handle) = create_test_provider("https://api.calorieninjas.com/");
        assert_eq!(
            provider.nutrition_url(),
            "https://api.calorieninjas.com/v1/nutrition"
        );
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let (provider, _handle) = create_test_provider("http://test.local");
        let result = provider.fetch_items("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    /// Serves a fixed nutrition response on an ephemeral port
    async fn fake_nutrition_api() -> String {
        let app = Router::new().route(
            "/v1/nutrition",
            get(|| async {
                Json(json!({
                    "items": [{
                        "name": "chicken",
                        "protein_g": 100.0,
                        "carbohydrates_total_g": 100.0,
                        "fat_total_g": 100.0
                    }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Accepts Redis connections and never answers
    async fn unresponsive_redis_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("redis://{}", addr)
    }

    #[tokio::test]
    async fn test_unresponsive_cache_falls_back_to_api() {
        let api_url = fake_nutrition_api().await;
        let redis_url = unresponsive_redis_url().await;
        let (provider, _handle) = provider_with_redis(&api_url, &redis_url);

        let items = tokio::time::timeout(
            Duration::from_secs(2),
            provider.fetch_items("200 g chicken"),
        )
        .await
        .expect("lookup should not wait on the cache")
        .unwrap();

        let totals = NutritionTotals::from_items(&items);
        assert_eq!(totals.protein, 100.0);
        assert_eq!(totals.fats, 100.0);
    }

    #[tokio::test]
    async fn test_unresponsive_cache_keeps_goal_scores() {
        use crate::{
            models::{DietaryGoals, UserProfile},
            services::GoalCompletionCalculator,
        };
        use std::sync::Arc;

        let api_url = fake_nutrition_api().await;
        let redis_url = unresponsive_redis_url().await;
        let (provider, _handle) = provider_with_redis(&api_url, &redis_url);
        let calculator = GoalCompletionCalculator::new(Arc::new(provider), Duration::from_secs(2));

        let mut current = UserProfile::new("Alex", "Toronto");
        current.dietary_goals = DietaryGoals {
            protein: 100.0,
            carbs: 100.0,
            fats: 100.0,
        };
        current.add_ingredient("chicken", "200g");
        let candidate = UserProfile::new("Sam", "Toronto");

        let assessment = calculator.compute(&current, &candidate).await;
        assert_eq!(assessment.sub_score, 1.0);
        assert_eq!(assessment.goal_completion.protein, 100);
    }
}
