use serde::{Deserialize, Serialize};

use super::{UserId, UserProfile};

/// Result of liking another user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeOutcome {
    /// True when the like was reciprocated and a match now exists
    pub matched: bool,
}

/// What the client sees of a matched user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: UserId,
    pub name: String,
    pub image: String,
}

impl From<&UserProfile> for MatchSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            image: profile.image.clone(),
        }
    }
}
