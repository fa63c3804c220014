use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Percentage of each dietary goal met by the pair's combined ingredients, 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCompletion {
    pub protein: u8,
    pub carbs: u8,
    pub fats: u8,
}

/// Outcome of scoring one candidate against the current user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    /// 0-100
    pub score: u8,
    pub goal_completion: GoalCompletion,
}

impl CompatibilityResult {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// A candidate profile annotated with its compatibility, as listed to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub compatibility_score: u8,
    pub goal_completion: GoalCompletion,
}

impl RankedCandidate {
    pub fn new(profile: UserProfile, result: CompatibilityResult) -> Self {
        Self {
            profile,
            compatibility_score: result.score,
            goal_completion: result.goal_completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_candidate_flattens_profile() {
        let profile = UserProfile::new("Riley", "Austin");
        let ranked = RankedCandidate::new(
            profile.clone(),
            CompatibilityResult {
                score: 72,
                goal_completion: GoalCompletion {
                    protein: 50,
                    carbs: 100,
                    fats: 100,
                },
            },
        );

        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], profile.id.to_string());
        assert_eq!(json["name"], "Riley");
        assert_eq!(json["compatibilityScore"], 72);
        assert_eq!(json["goalCompletion"]["protein"], 50);
        assert!(json.get("profile").is_none());
    }
}
