use serde::{Deserialize, Serialize};
use std::fmt::Display;

const GRAMS_PER_OUNCE: f64 = 28.3495;
const GRAMS_PER_POUND: f64 = 453.592;

/// Canonical unit a parsed quantity is normalized into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Gram,
    Milliliter,
    Cup,
    Tablespoon,
    Teaspoon,
    /// Bare number, e.g. "3" eggs
    Count,
}

impl Unit {
    /// Maps a lowercase unit token to its canonical unit and conversion factor
    fn from_token(token: &str) -> Option<(Unit, f64)> {
        let unit = match token {
            "g" | "gr" | "gram" | "grams" => (Unit::Gram, 1.0),
            "kg" | "kgs" | "kilogram" | "kilograms" => (Unit::Gram, 1000.0),
            "mg" | "milligram" | "milligrams" => (Unit::Gram, 0.001),
            "oz" | "ounce" | "ounces" => (Unit::Gram, GRAMS_PER_OUNCE),
            "lb" | "lbs" | "pound" | "pounds" => (Unit::Gram, GRAMS_PER_POUND),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                (Unit::Milliliter, 1.0)
            }
            "l" | "liter" | "liters" | "litre" | "litres" => (Unit::Milliliter, 1000.0),
            "cup" | "cups" => (Unit::Cup, 1.0),
            "tbsp" | "tablespoon" | "tablespoons" => (Unit::Tablespoon, 1.0),
            "tsp" | "teaspoon" | "teaspoons" => (Unit::Teaspoon, 1.0),
            _ => return None,
        };
        Some(unit)
    }

    fn symbol(&self) -> Option<&'static str> {
        match self {
            Unit::Gram => Some("g"),
            Unit::Milliliter => Some("ml"),
            Unit::Cup => Some("cup"),
            Unit::Tablespoon => Some("tbsp"),
            Unit::Teaspoon => Some("tsp"),
            Unit::Count => None,
        }
    }
}

/// A parsed amount expressed in a canonical unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub amount: f64,
    pub unit: Unit,
}

impl Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let amount = format_amount(self.amount);
        match self.unit.symbol() {
            Some(symbol) => write!(f, "{} {}", amount, symbol),
            None => write!(f, "{}", amount),
        }
    }
}

/// Ingredient quantity as typed by the user, plus its normalized form when parseable.
///
/// The raw text is what gets stored and serialized; the normalized form is only
/// used to build nutrition lookup queries. Text that can't be parsed (e.g.
/// "a pinch", "2 large") passes through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    raw: String,
    measure: Option<Measure>,
}

impl Quantity {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let measure = parse_measure(&raw);
        Self { raw, measure }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn measure(&self) -> Option<&Measure> {
        self.measure.as_ref()
    }

    /// Quantity text handed to the nutrition lookup
    pub fn normalized(&self) -> String {
        match &self.measure {
            Some(measure) => measure.to_string(),
            None => self.raw.trim().to_string(),
        }
    }
}

impl From<String> for Quantity {
    fn from(raw: String) -> Self {
        Quantity::new(raw)
    }
}

impl From<&str> for Quantity {
    fn from(raw: &str) -> Self {
        Quantity::new(raw)
    }
}

impl Serialize for Quantity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Quantity::new)
    }
}

fn parse_measure(text: &str) -> Option<Measure> {
    let (amount, rest) = parse_amount(text.trim())?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    let token = rest.trim().to_lowercase();
    let (unit, factor) = if token.is_empty() {
        (Unit::Count, 1.0)
    } else {
        Unit::from_token(token.trim_end_matches('.'))?
    };

    Some(Measure {
        amount: amount * factor,
        unit,
    })
}

/// Parses "2", "1.5", "1/2" and mixed numbers like "1 1/2"
fn parse_amount(text: &str) -> Option<(f64, &str)> {
    let (whole, rest) = leading_number(text)?;

    let trimmed = rest.trim_start();
    if trimmed.len() < rest.len() {
        if let Some((fraction, after)) = leading_number(trimmed) {
            let token = &trimmed[..trimmed.len() - after.len()];
            if token.contains('/') {
                return Some((whole + fraction, after));
            }
        }
    }

    Some((whole, rest))
}

fn leading_number(text: &str) -> Option<(f64, &str)> {
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let value = parse_number(&text[..end])?;
    Some((value, &text[end..]))
}

fn parse_number(token: &str) -> Option<f64> {
    match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => token.parse().ok(),
    }
}

/// Rounds to two decimals and drops trailing zeros
fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_glued_to_number() {
        let quantity = Quantity::new("200g");
        assert_eq!(
            quantity.measure(),
            Some(&Measure {
                amount: 200.0,
                unit: Unit::Gram
            })
        );
        assert_eq!(quantity.normalized(), "200 g");
    }

    #[test]
    fn test_mass_units_convert_to_grams() {
        assert_eq!(Quantity::new("1.5 kg").normalized(), "1500 g");
        assert_eq!(Quantity::new("500 mg").normalized(), "0.5 g");
        assert_eq!(Quantity::new("1 lb").normalized(), "453.59 g");
        assert_eq!(Quantity::new("2 Ounces").normalized(), "56.7 g");
    }

    #[test]
    fn test_litres_convert_to_millilitres() {
        assert_eq!(Quantity::new("1L").normalized(), "1000 ml");
        assert_eq!(Quantity::new("250 ml").normalized(), "250 ml");
    }

    #[test]
    fn test_kitchen_units_and_fractions() {
        assert_eq!(Quantity::new("1/2 cup").normalized(), "0.5 cup");
        assert_eq!(Quantity::new("1 1/2 cups").normalized(), "1.5 cup");
        assert_eq!(Quantity::new("2 Tbsp.").normalized(), "2 tbsp");
        assert_eq!(Quantity::new("3 teaspoons").normalized(), "3 tsp");
    }

    #[test]
    fn test_bare_number_is_count() {
        let quantity = Quantity::new("3");
        assert_eq!(quantity.measure().map(|m| m.unit), Some(Unit::Count));
        assert_eq!(quantity.normalized(), "3");
    }

    #[test]
    fn test_unparseable_text_passes_through() {
        assert_eq!(Quantity::new(" a pinch ").normalized(), "a pinch");
        assert_eq!(Quantity::new("2 large").measure(), None);
        assert_eq!(Quantity::new("2 large").normalized(), "2 large");
        assert_eq!(Quantity::new("1/0 cup").measure(), None);
        assert_eq!(Quantity::new("").normalized(), "");
    }

    #[test]
    fn test_serializes_raw_text() {
        let quantity = Quantity::new("1L");
        assert_eq!(serde_json::to_string(&quantity).unwrap(), "\"1L\"");

        let parsed: Quantity = serde_json::from_str("\"200g\"").unwrap();
        assert_eq!(parsed.raw(), "200g");
        assert_eq!(parsed.normalized(), "200 g");
    }
}
