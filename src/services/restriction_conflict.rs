use thiserror::Error;

use crate::models::{DietaryFlag, UserProfile};

/// Deducted for each restriction the current user has and the candidate lacks
pub const RESTRICTION_PENALTY: f64 = 0.3;
/// Deducted once if any of the current user's allergens is in the candidate's fridge
pub const ALLERGY_PENALTY: f64 = 0.5;

/// Restriction data the evaluator refuses to interpret
#[derive(Debug, Error, PartialEq)]
pub enum ConflictError {
    #[error("blank allergy entry for user {0}")]
    BlankAllergy(uuid::Uuid),
}

/// Computes the [0, 1] restriction multiplier for a pair.
///
/// Only the current user's requirements count: a restriction the candidate has
/// and the current user lacks costs nothing. Allergens match ingredient names
/// by exact string equality.
///
/// Fail-closed: restriction data that can't be evaluated yields 0, since a
/// missed allergy is worse than a missed match.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictionConflictEvaluator;

impl RestrictionConflictEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, current: &UserProfile, candidate: &UserProfile) -> f64 {
        match self.evaluate(current, candidate) {
            Ok(multiplier) => multiplier,
            Err(e) => {
                tracing::error!(
                    user_id = %current.id,
                    candidate_id = %candidate.id,
                    error = %e,
                    "Restriction evaluation failed, using multiplier 0"
                );
                0.0
            }
        }
    }

    pub fn evaluate(
        &self,
        current: &UserProfile,
        candidate: &UserProfile,
    ) -> Result<f64, ConflictError> {
        let mine = &current.dietary_restrictions;
        let theirs = &candidate.dietary_restrictions;

        if mine.allergies.iter().any(|a| a.trim().is_empty()) {
            return Err(ConflictError::BlankAllergy(current.id));
        }

        let mut multiplier = 1.0;

        for flag in DietaryFlag::ALL {
            if mine.has(flag) && !theirs.has(flag) {
                tracing::debug!(
                    candidate_id = %candidate.id,
                    restriction = flag.as_str(),
                    "Restriction mismatch"
                );
                multiplier -= RESTRICTION_PENALTY;
            }
        }

        let conflicting: Vec<&String> = mine
            .allergies
            .iter()
            .filter(|allergen| candidate.has_ingredient(allergen))
            .collect();

        if !conflicting.is_empty() {
            tracing::debug!(
                candidate_id = %candidate.id,
                allergens = ?conflicting,
                "Allergy conflict"
            );
            multiplier -= ALLERGY_PENALTY;
        }

        Ok(f64::max(0.0, multiplier))
    }
}
