use crate::models::UserProfile;

/// Shared-cuisine score in [0, 1]
///
/// Shared cuisines are divided by the size of the *smaller* preference set, so a
/// user whose whole list is contained in the other's scores 1.0. An empty list
/// on either side scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CuisineOverlapScorer;

impl CuisineOverlapScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, current: &UserProfile, candidate: &UserProfile) -> f64 {
        let mine = &current.preferences.cuisines;
        let theirs = &candidate.preferences.cuisines;

        if mine.is_empty() || theirs.is_empty() {
            return 0.0;
        }

        let shared = mine.intersection(theirs).count();
        let smaller = mine.len().min(theirs.len());
        let score = f64::min(1.0, shared as f64 / smaller as f64);

        tracing::debug!(
            candidate_id = %candidate.id,
            shared,
            score,
            "Cuisine overlap computed"
        );

        score
    }
}
