use std::sync::Arc;

use crate::{db::ProfileRepository, services::CandidateRanker};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProfileRepository>,
    pub ranker: Arc<CandidateRanker>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProfileRepository>, ranker: CandidateRanker) -> Self {
        Self {
            repository,
            ranker: Arc::new(ranker),
        }
    }
}
