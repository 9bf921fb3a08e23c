use serde::{Deserialize, Serialize};

use crate::error::InsufficientData;
use crate::profile::{ActivityLevel, Goal, Profile};

/// Shown instead of a number when the profile lacks height, weight or age.
pub const CALORIE_PLACEHOLDER: &str = "Enter your details to calculate";

const DEFAULT_ACTIVITY_FACTOR: f64 = 1.2;

/// Every step of a daily calorie estimate, for display or debugging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieBreakdown {
    pub base_estimate: f64,
    pub activity_factor: f64,
    pub goal_adjustment: f64,
    pub daily_calories: i64,
}

/// Multiplier applied to the base estimate. Missing or unrecognized levels
/// count as sedentary.
pub fn activity_factor(level: Option<&ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) => 1.55,
        Some(ActivityLevel::Very) => 1.725,
        Some(ActivityLevel::Extra) => 1.9,
        Some(ActivityLevel::Other(_)) | None => DEFAULT_ACTIVITY_FACTOR,
    }
}

/// Calories added after the activity multiplier. Missing or unrecognized
/// goals count as maintain.
pub fn goal_adjustment(goal: Option<&Goal>) -> f64 {
    match goal {
        Some(Goal::Lose) => -500.0,
        Some(Goal::Gain) => 500.0,
        Some(Goal::Muscle) => 300.0,
        Some(Goal::Maintain) | Some(Goal::Other(_)) | None => 0.0,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Computes the full calorie breakdown for a profile.
///
/// The base estimate is `10*weight + 6.25*height - 5*age + 5`. The profile has
/// no sex field, so the male constant is always used.
///
/// # Arguments
/// * `profile`: The saved user profile.
///
/// # Returns
/// The breakdown, or `InsufficientData` when height, weight or age is missing,
/// zero, negative or not finite.
pub fn calorie_breakdown(profile: &Profile) -> Result<CalorieBreakdown, InsufficientData> {
    let height = positive(profile.height_cm).ok_or(InsufficientData)?;
    let weight = positive(profile.weight_kg).ok_or(InsufficientData)?;
    let age = positive(profile.age_years).ok_or(InsufficientData)?;

    let base_estimate = 10.0 * weight + 6.25 * height - 5.0 * age + 5.0;
    let activity_factor = activity_factor(profile.activity_level.as_ref());
    let goal_adjustment = goal_adjustment(profile.goal.as_ref());

    let total = base_estimate * activity_factor + goal_adjustment;
    // Halves round toward positive infinity.
    let daily_calories = (total + 0.5).floor() as i64;

    Ok(CalorieBreakdown {
        base_estimate,
        activity_factor,
        goal_adjustment,
        daily_calories,
    })
}

/// Estimated daily calorie target, rounded to the nearest whole calorie.
pub fn estimate_daily_calories(profile: &Profile) -> Result<i64, InsufficientData> {
    calorie_breakdown(profile).map(|breakdown| breakdown.daily_calories)
}

/// Text for the daily calorie readout.
pub fn display_daily_calories(profile: &Profile) -> String {
    match estimate_daily_calories(profile) {
        Ok(calories) => format!("{} calories/day", calories),
        Err(InsufficientData) => CALORIE_PLACEHOLDER.to_string(),
    }
}
