use serde::{Deserialize, Serialize};

/// Per-item record returned by the nutrition API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbohydrates_total_g: Option<f64>,
    #[serde(default)]
    pub fat_total_g: Option<f64>,
}

/// Raw response body of the nutrition API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NutritionResponse {
    #[serde(default)]
    pub items: Vec<NutritionItem>,
}

/// Aggregate macros of a combined ingredient list, in grams
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutritionTotals {
    /// Sums macros across items; missing or non-finite fields count as zero
    pub fn from_items(items: &[NutritionItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            protein: acc.protein + grams(item.protein_g),
            carbs: acc.carbs + grams(item.carbohydrates_total_g),
            fats: acc.fats + grams(item.fat_total_g),
        })
    }
}

fn grams(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}
