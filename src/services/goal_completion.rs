use std::{sync::Arc, time::Duration};

use crate::{
    error::AppError,
    models::{DietaryGoals, GoalCompletion, NutritionTotals, UserProfile},
    services::providers::NutritionLookup,
};

/// Goal completion for one pair: display percentages plus the [0, 1] sub-score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalAssessment {
    pub goal_completion: GoalCompletion,
    pub sub_score: f64,
}

impl GoalAssessment {
    /// Used whenever nutrition data is unavailable
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scores combined totals against the current user's goals
    ///
    /// A goal of zero (or less) counts as met. Each percentage is capped at 100;
    /// the sub-score is their mean divided by 100 and keeps full precision,
    /// while the display percentages are rounded.
    pub fn from_totals(totals: &NutritionTotals, goals: &DietaryGoals) -> Self {
        let protein = completion_percent(totals.protein, goals.protein);
        let carbs = completion_percent(totals.carbs, goals.carbs);
        let fats = completion_percent(totals.fats, goals.fats);

        Self {
            goal_completion: GoalCompletion {
                protein: protein.round() as u8,
                carbs: carbs.round() as u8,
                fats: fats.round() as u8,
            },
            sub_score: (protein + carbs + fats) / 300.0,
        }
    }
}

fn completion_percent(total: f64, goal: f64) -> f64 {
    if goal.is_nan() || goal <= 0.0 {
        return 100.0;
    }
    let percent = total / goal * 100.0;
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Builds the nutrition query for a pair: current user's items first, then the candidate's
pub fn combined_description(current: &UserProfile, candidate: &UserProfile) -> String {
    current
        .ingredients_list
        .iter()
        .chain(candidate.ingredients_list.iter())
        .map(|entry| entry.describe())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Measures how well a pair's combined ingredients cover the current user's macro goals
///
/// Fail-soft: a lookup error, timeout or empty result yields [`GoalAssessment::zero`]
/// instead of an error, so one bad lookup never aborts ranking.
#[derive(Clone)]
pub struct GoalCompletionCalculator {
    lookup: Arc<dyn NutritionLookup>,
    timeout: Duration,
}

impl GoalCompletionCalculator {
    pub fn new(lookup: Arc<dyn NutritionLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    pub async fn compute(&self, current: &UserProfile, candidate: &UserProfile) -> GoalAssessment {
        let query = combined_description(current, candidate);
        if query.is_empty() {
            tracing::debug!(
                user_id = %current.id,
                candidate_id = %candidate.id,
                "No ingredients to look up"
            );
            return GoalAssessment::zero();
        }

        let lookup = tokio::time::timeout(self.timeout, self.lookup.fetch_items(&query))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Timeout(format!(
                    "{} lookup exceeded {}ms",
                    self.lookup.name(),
                    self.timeout.as_millis()
                )))
            });

        let items = match lookup {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => {
                tracing::warn!(
                    candidate_id = %candidate.id,
                    provider = self.lookup.name(),
                    "Nutrition lookup returned no items"
                );
                return GoalAssessment::zero();
            }
            Err(e) => {
                tracing::warn!(
                    candidate_id = %candidate.id,
                    provider = self.lookup.name(),
                    error = %e,
                    "Nutrition lookup failed, scoring goals as zero"
                );
                return GoalAssessment::zero();
            }
        };

        let totals = NutritionTotals::from_items(&items);
        let assessment = GoalAssessment::from_totals(&totals, &current.dietary_goals);

        tracing::debug!(
            candidate_id = %candidate.id,
            protein_g = totals.protein,
            carbs_g = totals.carbs,
            fats_g = totals.fats,
            sub_score = assessment.sub_score,
            "Goal completion computed"
        );

        assessment
    }
}
