use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};
use uuid::Uuid;

use super::Quantity;

pub type UserId = Uuid;

/// Cuisine vocabulary users can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    American,
    Chinese,
    Indian,
    Italian,
    Mexican,
    Korean,
    Japanese,
    Persian,
    Jamaican,
}

impl Cuisine {
    pub const ALL: [Cuisine; 9] = [
        Cuisine::American,
        Cuisine::Chinese,
        Cuisine::Indian,
        Cuisine::Italian,
        Cuisine::Mexican,
        Cuisine::Korean,
        Cuisine::Japanese,
        Cuisine::Persian,
        Cuisine::Jamaican,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::American => "American",
            Cuisine::Chinese => "Chinese",
            Cuisine::Indian => "Indian",
            Cuisine::Italian => "Italian",
            Cuisine::Mexican => "Mexican",
            Cuisine::Korean => "Korean",
            Cuisine::Japanese => "Japanese",
            Cuisine::Persian => "Persian",
            Cuisine::Jamaican => "Jamaican",
        }
    }
}

impl Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown cuisine: {}", s))
    }
}

/// One line of a user's fridge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientEntry {
    pub ingredient: String,
    pub quantity: Quantity,
}

impl IngredientEntry {
    pub fn new(ingredient: impl Into<String>, quantity: impl Into<Quantity>) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity: quantity.into(),
        }
    }

    /// "<quantity> <ingredient>" with the quantity normalized
    pub fn describe(&self) -> String {
        let quantity = self.quantity.normalized();
        let ingredient = self.ingredient.trim();
        if quantity.is_empty() {
            ingredient.to_string()
        } else {
            format!("{} {}", quantity, ingredient)
        }
    }
}

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DietaryGoals {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Boolean dietary restrictions that can conflict between users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietaryFlag {
    Vegetarian,
    Vegan,
    Kosher,
    GlutenFree,
    DairyFree,
}

impl DietaryFlag {
    pub const ALL: [DietaryFlag; 5] = [
        DietaryFlag::Vegetarian,
        DietaryFlag::Vegan,
        DietaryFlag::Kosher,
        DietaryFlag::GlutenFree,
        DietaryFlag::DairyFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryFlag::Vegetarian => "vegetarian",
            DietaryFlag::Vegan => "vegan",
            DietaryFlag::Kosher => "kosher",
            DietaryFlag::GlutenFree => "glutenFree",
            DietaryFlag::DairyFree => "dairyFree",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DietaryRestrictions {
    pub vegetarian: bool,
    pub vegan: bool,
    pub kosher: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub allergies: BTreeSet<String>,
}

impl DietaryRestrictions {
    pub fn has(&self, flag: DietaryFlag) -> bool {
        match flag {
            DietaryFlag::Vegetarian => self.vegetarian,
            DietaryFlag::Vegan => self.vegan,
            DietaryFlag::Kosher => self.kosher,
            DietaryFlag::GlutenFree => self.gluten_free,
            DietaryFlag::DairyFree => self.dairy_free,
        }
    }

    pub fn set(&mut self, flag: DietaryFlag, value: bool) {
        match flag {
            DietaryFlag::Vegetarian => self.vegetarian = value,
            DietaryFlag::Vegan => self.vegan = value,
            DietaryFlag::Kosher => self.kosher = value,
            DietaryFlag::GlutenFree => self.gluten_free = value,
            DietaryFlag::DairyFree => self.dairy_free = value,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub cuisines: BTreeSet<Cuisine>,
}

/// Snapshot of a user as seen by the matching engine.
///
/// Every field except `id` and `name` has a default, so a partially filled
/// record never leaves the scorer with missing data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    /// Only ever compared for equality when building the candidate pool
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub ingredients_list: Vec<IngredientEntry>,
    #[serde(default)]
    pub dietary_goals: DietaryGoals,
    #[serde(default)]
    pub dietary_restrictions: DietaryRestrictions,
    #[serde(default)]
    pub preferences: Preferences,
}

impl UserProfile {
    /// Creates a profile with a fresh ID and empty preferences
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bio: String::new(),
            image: String::new(),
            location: location.into(),
            ingredients_list: Vec::new(),
            dietary_goals: DietaryGoals::default(),
            dietary_restrictions: DietaryRestrictions::default(),
            preferences: Preferences::default(),
        }
    }

    pub fn add_ingredient(&mut self, ingredient: impl Into<String>, quantity: &str) {
        self.ingredients_list
            .push(IngredientEntry::new(ingredient, quantity));
    }

    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients_list.iter().any(|i| i.ingredient == name)
    }
}
