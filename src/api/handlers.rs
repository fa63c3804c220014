use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MatchSummary, RankedCandidate, SwipeOutcome, UserId, UserProfile},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub users: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchSummary>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn require_profile(state: &AppState, id: UserId) -> AppResult<UserProfile> {
    state
        .repository
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
}

/// Both ends of a swipe must exist and differ
async fn validate_swipe(state: &AppState, user_id: UserId, target_id: UserId) -> AppResult<()> {
    if user_id == target_id {
        return Err(AppError::InvalidInput("Users cannot swipe on themselves".to_string()));
    }
    require_profile(state, user_id).await?;
    require_profile(state, target_id).await?;
    Ok(())
}

/// Ranked candidate pool for a user, best match first
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<UserId>,
) -> AppResult<Json<CandidatesResponse>> {
    let current = require_profile(&state, id).await?;
    let pool = state.repository.list_candidates(&current).await?;

    tracing::debug!(
        request_id = %request_id,
        user_id = %id,
        pool = pool.len(),
        "Ranking candidate pool"
    );

    let users = state.ranker.rank(&current, pool).await;
    Ok(Json(CandidatesResponse { users }))
}

pub async fn like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((id, target_id)): Path<(UserId, UserId)>,
) -> AppResult<Json<SwipeOutcome>> {
    validate_swipe(&state, id, target_id).await?;
    let outcome = state.repository.record_like(id, target_id).await?;

    if outcome.matched {
        tracing::info!(
            request_id = %request_id,
            user_id = %id,
            target_id = %target_id,
            "New match"
        );
    }

    Ok(Json(outcome))
}

pub async fn dislike(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((id, target_id)): Path<(UserId, UserId)>,
) -> AppResult<StatusCode> {
    validate_swipe(&state, id, target_id).await?;
    state.repository.record_dislike(id, target_id).await?;

    tracing::debug!(request_id = %request_id, user_id = %id, target_id = %target_id, "Disliked");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_matches(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> AppResult<Json<MatchesResponse>> {
    require_profile(&state, id).await?;
    let matches = state.repository.list_matches(id).await?;
    Ok(Json(MatchesResponse { matches }))
}
