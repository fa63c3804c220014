use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::instrument;

use crate::{
    models::{CompatibilityResult, RankedCandidate, UserProfile},
    services::compatibility::CompatibilityScorer,
};

/// Scores a pre-filtered candidate pool and orders it best match first
///
/// Candidates are scored concurrently, at most `max_concurrent` at a time. Ties
/// keep their input order. Dropping the future aborts any scoring still in flight.
#[derive(Clone)]
pub struct CandidateRanker {
    scorer: Arc<CompatibilityScorer>,
    max_concurrent: usize,
}

impl CandidateRanker {
    pub fn new(scorer: CompatibilityScorer, max_concurrent: usize) -> Self {
        Self {
            scorer: Arc::new(scorer),
            max_concurrent: max_concurrent.max(1),
        }
    }

    #[instrument(skip_all, fields(user_id = %current.id, pool = candidates.len()))]
    pub async fn rank(
        &self,
        current: &UserProfile,
        candidates: Vec<UserProfile>,
    ) -> Vec<RankedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let current = Arc::new(current.clone());
        let candidates: Vec<Arc<UserProfile>> = candidates.into_iter().map(Arc::new).collect();
        let permits = Arc::new(Semaphore::new(self.max_concurrent));

        let mut tasks = JoinSet::new();
        for (index, candidate) in candidates.iter().enumerate() {
            let scorer = Arc::clone(&self.scorer);
            let current = Arc::clone(&current);
            let candidate = Arc::clone(candidate);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                (index, scorer.score(&current, &candidate).await)
            });
        }

        let mut results: Vec<Option<CompatibilityResult>> = vec![None; candidates.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!(error = %e, "Candidate scoring task failed"),
            }
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .zip(results)
            .map(|(candidate, result)| {
                let result = result.unwrap_or_else(|| {
                    tracing::warn!(candidate_id = %candidate.id, "No score for candidate, using 0");
                    CompatibilityResult::zero()
                });
                let profile = Arc::try_unwrap(candidate).unwrap_or_else(|arc| (*arc).clone());
                RankedCandidate::new(profile, result)
            })
            .collect();

        // Stable sort keeps input order among equal scores
        ranked.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

        tracing::info!(
            ranked = ranked.len(),
            top_score = ranked.first().map(|r| r.compatibility_score),
            "Candidates ranked"
        );

        ranked
    }
}
