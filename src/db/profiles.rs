use serde::de::DeserializeOwned;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::ProfileRepository,
    error::AppResult,
    models::{
        Cuisine, DietaryGoals, DietaryRestrictions, IngredientEntry, MatchSummary, Preferences,
        SwipeOutcome, UserId, UserProfile,
    },
};

const PROFILE_COLUMNS: &str = "u.id, u.name, u.bio, u.image, u.location, u.ingredients, \
     u.dietary_goals, u.dietary_restrictions, u.cuisines";

/// Raw row; JSONB sections are decoded leniently in [`ProfileRow::into_profile`]
#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    bio: String,
    image: String,
    location: String,
    ingredients: Json<serde_json::Value>,
    dietary_goals: Json<serde_json::Value>,
    dietary_restrictions: Json<serde_json::Value>,
    cuisines: Vec<String>,
}

impl ProfileRow {
    /// Converts the row, replacing any malformed section with its default
    fn into_profile(self) -> UserProfile {
        let id = self.id;

        let cuisines = self
            .cuisines
            .iter()
            .filter_map(|c| match c.parse::<Cuisine>() {
                Ok(cuisine) => Some(cuisine),
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Dropping unknown cuisine");
                    None
                }
            })
            .collect();

        UserProfile {
            id,
            name: self.name,
            bio: self.bio,
            image: self.image,
            location: self.location,
            ingredients_list: decode_or_default::<Vec<IngredientEntry>>(
                id,
                "ingredients",
                self.ingredients.0,
            ),
            dietary_goals: decode_or_default::<DietaryGoals>(
                id,
                "dietary_goals",
                self.dietary_goals.0,
            ),
            dietary_restrictions: decode_or_default::<DietaryRestrictions>(
                id,
                "dietary_restrictions",
                self.dietary_restrictions.0,
            ),
            preferences: Preferences { cuisines },
        }
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(
    id: Uuid,
    column: &'static str,
    value: serde_json::Value,
) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(user_id = %id, column, error = %e, "Malformed profile section, using default");
        T::default()
    })
}

/// Stores a pair with the smaller id first, matching the `matches` table check
fn ordered_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// PostgreSQL-backed profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Closes the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[async_trait::async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_profile(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        let sql = format!("SELECT {} FROM user_profiles u WHERE u.id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn list_candidates(&self, current: &UserProfile) -> AppResult<Vec<UserProfile>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM user_profiles u
            WHERE u.id <> $1
              AND u.location = $2
              AND NOT EXISTS (
                  SELECT 1 FROM swipes s WHERE s.user_id = $1 AND s.target_id = u.id
              )
              AND NOT EXISTS (
                  SELECT 1 FROM matches m
                  WHERE (m.user_a = $1 AND m.user_b = u.id)
                     OR (m.user_a = u.id AND m.user_b = $1)
              )
            ORDER BY u.created_at, u.id
            "#,
            PROFILE_COLUMNS
        );

        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(current.id)
            .bind(&current.location)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            user_id = %current.id,
            candidates = rows.len(),
            "Candidate pool loaded"
        );

        Ok(rows.into_iter().map(ProfileRow::into_profile).collect())
    }

    async fn record_like(&self, user_id: UserId, target_id: UserId) -> AppResult<SwipeOutcome> {
        let mut tx = self.pool.begin().await?;

        // Lock both profiles in a fixed order so crossing likes can't both miss each other
        let (first, second) = ordered_pair(user_id, target_id);
        sqlx::query("SELECT id FROM user_profiles WHERE id IN ($1, $2) ORDER BY id FOR UPDATE")
            .bind(first)
            .bind(second)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO swipes (user_id, target_id, kind) VALUES ($1, $2, 'like') \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        let reciprocated: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM swipes WHERE user_id = $1 AND target_id = $2 AND kind = 'like')",
        )
        .bind(target_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if reciprocated {
            sqlx::query("INSERT INTO matches (user_a, user_b) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(first)
                .bind(second)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(SwipeOutcome {
            matched: reciprocated,
        })
    }

    async fn record_dislike(&self, user_id: UserId, target_id: UserId) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO swipes (user_id, target_id, kind) VALUES ($1, $2, 'dislike') \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_matches(&self, user_id: UserId) -> AppResult<Vec<MatchSummary>> {
        let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            r#"
            SELECT u.id, u.name, u.image
            FROM matches m
            JOIN user_profiles u
              ON u.id = CASE WHEN m.user_a = $1 THEN m.user_b ELSE m.user_a END
            WHERE m.user_a = $1 OR m.user_b = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, image)| MatchSummary { id, name, image })
            .collect())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let cuisines: Vec<String> = profile
            .preferences
            .cuisines
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (id, name, bio, image, location, ingredients, dietary_goals, dietary_restrictions, cuisines)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                bio = EXCLUDED.bio,
                image = EXCLUDED.image,
                location = EXCLUDED.location,
                ingredients = EXCLUDED.ingredients,
                dietary_goals = EXCLUDED.dietary_goals,
                dietary_restrictions = EXCLUDED.dietary_restrictions,
                cuisines = EXCLUDED.cuisines,
                updated_at = NOW()
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.image)
        .bind(&profile.location)
        .bind(Json(&profile.ingredients_list))
        .bind(Json(&profile.dietary_goals))
        .bind(Json(&profile.dietary_restrictions))
        .bind(cuisines)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(
        ingredients: serde_json::Value,
        restrictions: serde_json::Value,
        cuisines: Vec<&str>,
    ) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            name: "Casey".to_string(),
            bio: String::new(),
            image: "/avatars/8.jpg".to_string(),
            location: "Denver".to_string(),
            ingredients: Json(ingredients),
            dietary_goals: Json(json!({ "protein": 150, "carbs": 220, "fats": 60 })),
            dietary_restrictions: Json(restrictions),
            cuisines: cuisines.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_into_profile_decodes_sections() {
        let profile = row(
            json!([{ "ingredient": "Salt", "quantity": "500g" }]),
            json!({ "vegan": true, "allergies": ["shellfish"] }),
            vec!["Mexican", "Korean"],
        )
        .into_profile();

        assert_eq!(profile.ingredients_list.len(), 1);
        assert_eq!(profile.dietary_goals.carbs, 220.0);
        assert!(profile.dietary_restrictions.vegan);
        assert!(profile.dietary_restrictions.allergies.contains("shellfish"));
        assert_eq!(profile.preferences.cuisines.len(), 2);
    }

    #[test]
    fn test_malformed_sections_fall_back_to_defaults() {
        let profile = row(
            json!({ "not": "a list" }),
            json!({ "vegan": "yes" }),
            vec!["Italian", "Martian"],
        )
        .into_profile();

        assert!(profile.ingredients_list.is_empty());
        assert_eq!(profile.dietary_restrictions, DietaryRestrictions::default());
        assert_eq!(
            profile.preferences.cuisines.into_iter().collect::<Vec<_>>(),
            vec![Cuisine::Italian]
        );
    }

    #[test]
    fn test_ordered_pair() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(ordered_pair(a, b), ordered_pair(b, a));
        let (lo, hi) = ordered_pair(a, b);
        assert!(lo <= hi);
    }

    /// Repository over a live database; `None` unless DATABASE_URL is set
    async fn live_repository() -> Option<PgProfileRepository> {
        let database_url = std::env::var("DATABASE_URL").ok()?;
        let pool = crate::db::create_pool(&database_url).await.unwrap();
        Some(PgProfileRepository::new(pool))
    }

    /// Fresh location per test so runs never see each other's rows
    fn isolated_location() -> String {
        format!("test-{}", Uuid::new_v4())
    }

    async fn insert(repo: &PgProfileRepository, name: &str, location: &str) -> UserProfile {
        let profile = UserProfile::new(name, location);
        repo.upsert_profile(&profile).await.unwrap();
        profile
    }

    async fn match_rows(repo: &PgProfileRepository, a: UserId, b: UserId) -> i64 {
        let (user_a, user_b) = ordered_pair(a, b);
        sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE user_a = $1 AND user_b = $2")
            .bind(user_a)
            .bind(user_b)
            .fetch_one(&repo.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pg_candidates_filter_and_order() {
        let Some(repo) = live_repository().await else {
            return;
        };
        let location = isolated_location();

        let me = insert(&repo, "Alex", &location).await;
        let liked = insert(&repo, "Sam", &location).await;
        let disliked = insert(&repo, "Jamie", &location).await;
        let matched = insert(&repo, "Casey", &location).await;
        let first = insert(&repo, "Avery", &location).await;
        let second = insert(&repo, "Riley", &location).await;
        insert(&repo, "Quinn", &isolated_location()).await;

        repo.record_like(me.id, liked.id).await.unwrap();
        repo.record_dislike(me.id, disliked.id).await.unwrap();
        repo.record_like(matched.id, me.id).await.unwrap();
        repo.record_like(me.id, matched.id).await.unwrap();

        let candidates = repo.list_candidates(&me).await.unwrap();
        let ids: Vec<UserId> = candidates.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_pg_mutual_like_creates_one_match() {
        let Some(repo) = live_repository().await else {
            return;
        };
        let location = isolated_location();

        let a = insert(&repo, "Morgan", &location).await;
        let b = insert(&repo, "Taylor", &location).await;

        assert!(!repo.record_like(a.id, b.id).await.unwrap().matched);
        assert!(repo.record_like(b.id, a.id).await.unwrap().matched);
        assert!(repo.record_like(b.id, a.id).await.unwrap().matched);

        assert_eq!(match_rows(&repo, a.id, b.id).await, 1);
        assert_eq!(
            repo.list_matches(a.id).await.unwrap(),
            vec![MatchSummary::from(&b)]
        );
        assert_eq!(
            repo.list_matches(b.id).await.unwrap(),
            vec![MatchSummary::from(&a)]
        );
    }

    #[tokio::test]
    async fn test_pg_upsert_round_trips_profile() {
        let Some(repo) = live_repository().await else {
            return;
        };

        let mut profile = UserProfile::new("Jordan", isolated_location());
        profile.add_ingredient("Olive Oil", "1L");
        profile.dietary_restrictions.gluten_free = true;
        profile.preferences.cuisines = [Cuisine::Korean].into_iter().collect();
        repo.upsert_profile(&profile).await.unwrap();

        profile.bio = "Weekend baker".to_string();
        repo.upsert_profile(&profile).await.unwrap();

        let stored = repo.get_profile(profile.id).await.unwrap();
        assert_eq!(stored, Some(profile));
    }
}
