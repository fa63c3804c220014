mod compatibility;
mod nutrition;
mod quantity;
mod swipe;
mod user_profile;

pub use compatibility::{CompatibilityResult, GoalCompletion, RankedCandidate};
pub use nutrition::{NutritionItem, NutritionResponse, NutritionTotals};
pub use quantity::{Measure, Quantity, Unit};
pub use swipe::{MatchSummary, SwipeOutcome};
pub use user_profile::{
    Cuisine, DietaryFlag, DietaryGoals, DietaryRestrictions, IngredientEntry, Preferences,
    UserId, UserProfile,
};
