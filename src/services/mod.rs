pub mod compatibility;
pub mod cuisine_overlap;
pub mod goal_completion;
pub mod providers;
pub mod ranking;
pub mod restriction_conflict;
pub mod seed;

pub use compatibility::CompatibilityScorer;
pub use cuisine_overlap::CuisineOverlapScorer;
pub use goal_completion::{GoalAssessment, GoalCompletionCalculator};
pub use providers::{CalorieNinjasProvider, NutritionLookup};
pub use ranking::CandidateRanker;
pub use restriction_conflict::RestrictionConflictEvaluator;
