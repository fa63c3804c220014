use crate::{
    models::{CompatibilityResult, UserProfile},
    services::{
        cuisine_overlap::CuisineOverlapScorer,
        goal_completion::{GoalAssessment, GoalCompletionCalculator},
        restriction_conflict::RestrictionConflictEvaluator,
    },
};

/// Points available to each factor; they sum to 100
pub const INGREDIENTS_WEIGHT: f64 = 40.0;
pub const RESTRICTIONS_WEIGHT: f64 = 30.0;
pub const CUISINES_WEIGHT: f64 = 30.0;

/// The three factor scores for a pair, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub ingredients: f64,
    pub restrictions: f64,
    pub cuisines: f64,
}

impl SubScores {
    /// Weighted sum rounded to an integer in [0, 100]
    pub fn weighted_total(&self) -> u8 {
        let total = unit(self.ingredients) * INGREDIENTS_WEIGHT
            + unit(self.restrictions) * RESTRICTIONS_WEIGHT
            + unit(self.cuisines) * CUISINES_WEIGHT;
        total.round().clamp(0.0, 100.0) as u8
    }
}

/// Bounds a sub-score to [0, 1], mapping NaN to 0
fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Combines goal completion, restriction conflicts and cuisine overlap into one score
///
/// Never fails: each component absorbs its own errors, so the result is always
/// a valid score.
#[derive(Clone)]
pub struct CompatibilityScorer {
    goals: GoalCompletionCalculator,
    restrictions: RestrictionConflictEvaluator,
    cuisines: CuisineOverlapScorer,
}

impl CompatibilityScorer {
    pub fn new(goals: GoalCompletionCalculator) -> Self {
        Self {
            goals,
            restrictions: RestrictionConflictEvaluator::new(),
            cuisines: CuisineOverlapScorer::new(),
        }
    }

    pub async fn score(&self, current: &UserProfile, candidate: &UserProfile) -> CompatibilityResult {
        let GoalAssessment {
            goal_completion,
            sub_score,
        } = self.goals.compute(current, candidate).await;

        let sub_scores = SubScores {
            ingredients: sub_score,
            restrictions: self.restrictions.compute(current, candidate),
            cuisines: self.cuisines.compute(current, candidate),
        };
        let score = sub_scores.weighted_total();

        tracing::debug!(
            user_id = %current.id,
            candidate_id = %candidate.id,
            ingredients = sub_scores.ingredients,
            restrictions = sub_scores.restrictions,
            cuisines = sub_scores.cuisines,
            score,
            "Compatibility scored"
        );

        CompatibilityResult {
            score,
            goal_completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{Cuisine, DietaryGoals, GoalCompletion, NutritionItem},
        services::providers::MockNutritionLookup,
    };
    use std::{sync::Arc, time::Duration};

    fn scorer(mock: MockNutritionLookup) -> CompatibilityScorer {
        CompatibilityScorer::new(GoalCompletionCalculator::new(
            Arc::new(mock),
            Duration::from_millis(200),
        ))
    }

    fn pair() -> (UserProfile, UserProfile) {
        let mut current = UserProfile::new("Alex", "Toronto");
        current.dietary_goals = DietaryGoals {
            protein: 100.0,
            carbs: 100.0,
            fats: 100.0,
        };
        current.add_ingredient("tofu", "300g");
        current.preferences.cuisines = [Cuisine::Italian, Cuisine::Mexican].into_iter().collect();

        let mut candidate = UserProfile::new("Sam", "Toronto");
        candidate.add_ingredient("pasta", "200g");
        candidate.preferences.cuisines = [Cuisine::Italian, Cuisine::Mexican, Cuisine::Korean]
            .into_iter()
            .collect();

        (current, candidate)
    }

    #[test]
    fn test_weights_sum_to_100() {
        assert_eq!(INGREDIENTS_WEIGHT + RESTRICTIONS_WEIGHT + CUISINES_WEIGHT, 100.0);
    }

    #[test]
    fn test_weighted_total_bounds() {
        let perfect = SubScores {
            ingredients: 1.0,
            restrictions: 1.0,
            cuisines: 1.0,
        };
        assert_eq!(perfect.weighted_total(), 100);

        let nothing = SubScores {
            ingredients: 0.0,
            restrictions: 0.0,
            cuisines: 0.0,
        };
        assert_eq!(nothing.weighted_total(), 0);

        let out_of_range = SubScores {
            ingredients: 1.7,
            restrictions: -0.4,
            cuisines: f64::NAN,
        };
        assert_eq!(out_of_range.weighted_total(), 40);
    }

    #[test]
    fn test_weighted_total_rounds() {
        let sub_scores = SubScores {
            ingredients: 250.0 / 300.0,
            restrictions: 0.7,
            cuisines: 0.5,
        };
        // 33.33 + 21 + 15 = 69.33
        assert_eq!(sub_scores.weighted_total(), 69);
    }

    #[tokio::test]
    async fn test_score_combines_all_factors() {
        let (mut current, candidate) = pair();
        current.dietary_restrictions.vegetarian = true;

        let mut mock = MockNutritionLookup::new();
        mock.expect_fetch_items().returning(|_| {
            Ok(vec![NutritionItem {
                name: "tofu and pasta".to_string(),
                protein_g: Some(50.0),
                carbohydrates_total_g: Some(100.0),
                fat_total_g: Some(150.0),
            }])
        });
        mock.expect_name().return_const("mock");

        let result = scorer(mock).score(&current, &candidate).await;

        // 0.8333 * 40 + 0.7 * 30 + 1.0 * 30 = 84.33
        assert_eq!(result.score, 84);
        assert_eq!(
            result.goal_completion,
            GoalCompletion {
                protein: 50,
                carbs: 100,
                fats: 100
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_still_scores_other_factors() {
        let (current, candidate) = pair();

        let mut mock = MockNutritionLookup::new();
        mock.expect_fetch_items()
            .returning(|_| Err(AppError::ExternalApi("unreachable".to_string())));
        mock.expect_name().return_const("mock");

        let result = scorer(mock).score(&current, &candidate).await;

        assert_eq!(result.score, 60);
        assert_eq!(result.goal_completion, GoalCompletion::default());
    }
}
