use std::path::Path;

use crate::{
    db::ProfileRepository,
    error::{AppError, AppResult},
    models::UserProfile,
};

/// Parses a JSON array of profiles
pub fn parse_profiles(json: &str) -> AppResult<Vec<UserProfile>> {
    serde_json::from_str(json)
        .map_err(|e| AppError::InvalidInput(format!("Invalid seed profiles: {}", e)))
}

/// Upserts every profile from a seed file, returning how many were written
pub async fn seed_from_file(repository: &dyn ProfileRepository, path: &Path) -> AppResult<usize> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Internal(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let profiles = parse_profiles(&json)?;
    seed_profiles(repository, &profiles).await
}

pub async fn seed_profiles(
    repository: &dyn ProfileRepository,
    profiles: &[UserProfile],
) -> AppResult<usize> {
    for profile in profiles {
        repository.upsert_profile(profile).await?;
    }

    tracing::info!(
        count = profiles.len(),
        backend = repository.name(),
        "Seed profiles loaded"
    );

    Ok(profiles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockProfileRepository;
    use tokio_test::assert_ok;

    const SEED: &str = r#"[
        {
            "id": "0b6c7f0e-8a40-4d0e-9a55-2b1b0f7f6a01",
            "name": "Taylor",
            "location": "Toronto",
            "ingredientsList": [{ "ingredient": "Salt", "quantity": "500g" }],
            "preferences": { "cuisines": ["Italian"] }
        },
        {
            "id": "0b6c7f0e-8a40-4d0e-9a55-2b1b0f7f6a02",
            "name": "Morgan",
            "location": "Toronto"
        }
    ]"#;

    #[test]
    fn test_parse_profiles() {
        let profiles = parse_profiles(SEED).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].ingredients_list[0].describe(), "500 g Salt");
        assert!(profiles[1].preferences.cuisines.is_empty());
    }

    #[test]
    fn test_parse_profiles_rejects_unknown_cuisine() {
        let json = r#"[{ "id": "0b6c7f0e-8a40-4d0e-9a55-2b1b0f7f6a01", "name": "X",
                        "preferences": { "cuisines": ["Martian"] } }]"#;
        assert!(matches!(parse_profiles(json), Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_seed_profiles_upserts_each() {
        let profiles = parse_profiles(SEED).unwrap();

        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile().times(2).returning(|_| Ok(()));
        repo.expect_name().return_const("mock");

        let count = assert_ok!(seed_profiles(&repo, &profiles).await);
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_seed_stops_on_storage_error() {
        let profiles = parse_profiles(SEED).unwrap();

        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile()
            .times(1)
            .returning(|_| Err(AppError::Internal("disk full".to_string())));

        let result = seed_profiles(&repo, &profiles).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_from_missing_file() {
        let repo = MockProfileRepository::new();
        let result = seed_from_file(&repo, Path::new("/nonexistent/profiles.json")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
