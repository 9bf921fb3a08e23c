use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lenient::optional_number;

/// How active the user is day to day. Labels match the profile form values.
///
/// Labels outside the known set are kept verbatim in `Other` so a stored
/// profile round-trips unchanged; they estimate like `Sedentary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
    Other(String),
}

impl ActivityLevel {
    pub fn label(&self) -> &str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extra => "extra",
            ActivityLevel::Other(label) => label,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "very" => ActivityLevel::Very,
            "extra" => ActivityLevel::Extra,
            _ => ActivityLevel::Other(label),
        }
    }
}

impl From<&str> for ActivityLevel {
    fn from(label: &str) -> Self {
        ActivityLevel::from(label.to_string())
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        match level {
            ActivityLevel::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user wants their intake to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    Lose,
    Gain,
    Muscle,
    Maintain,
    Other(String),
}

impl Goal {
    pub fn label(&self) -> &str {
        match self {
            Goal::Lose => "lose",
            Goal::Gain => "gain",
            Goal::Muscle => "muscle",
            Goal::Maintain => "maintain",
            Goal::Other(label) => label,
        }
    }
}

impl From<String> for Goal {
    fn from(label: String) -> Self {
        match label.as_str() {
            "lose" => Goal::Lose,
            "gain" => Goal::Gain,
            "muscle" => Goal::Muscle,
            "maintain" => Goal::Maintain,
            _ => Goal::Other(label),
        }
    }
}

impl From<&str> for Goal {
    fn from(label: &str) -> Self {
        Goal::from(label.to_string())
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body, activity and dietary preferences, stored under `userProfile`.
///
/// Saved wholesale; there is no partial update. The short names the browser
/// form used (`height`, `glutenfree`, ...) are accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, alias = "height", deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, alias = "weight", deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, alias = "age", deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,
    #[serde(default, alias = "activity", skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default, alias = "glutenfree")]
    pub gluten_free: bool,
    #[serde(default)]
    pub keto: bool,
    #[serde(default)]
    pub paleo: bool,
}

impl Profile {
    /// Dietary flags that are switched on, by their display names.
    pub fn dietary_restrictions(&self) -> Vec<&'static str> {
        [
            (self.vegetarian, "vegetarian"),
            (self.vegan, "vegan"),
            (self.gluten_free, "gluten-free"),
            (self.keto, "keto"),
            (self.paleo, "paleo"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}
