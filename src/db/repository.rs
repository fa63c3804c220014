use crate::{
    error::AppResult,
    models::{MatchSummary, SwipeOutcome, UserId, UserProfile},
};

/// Storage collaborator for profiles and swipe history
///
/// Constructed once at start-up and shared through `AppState`. The matching
/// engine only ever reads through it; swipes are the sole writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, id: UserId) -> AppResult<Option<UserProfile>>;

    /// Candidate pool for `current`, in stable insertion order
    ///
    /// Excludes the user themself, anyone they already liked or disliked, and
    /// existing matches. Only profiles with exactly the same `location` are kept.
    async fn list_candidates(&self, current: &UserProfile) -> AppResult<Vec<UserProfile>>;

    /// Records a like; creates a match when the target already liked the user
    async fn record_like(&self, user_id: UserId, target_id: UserId) -> AppResult<SwipeOutcome>;

    async fn record_dislike(&self, user_id: UserId, target_id: UserId) -> AppResult<()>;

    async fn list_matches(&self, user_id: UserId) -> AppResult<Vec<MatchSummary>>;

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
