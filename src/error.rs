use thiserror::Error;

use crate::meal_plan::MealSlot;

/// Height, weight or age is missing, zero or not a usable number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient profile data: height, weight and age must all be positive")]
pub struct InsufficientData;

/// A meal could not be saved to the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a meal name")]
    EmptyMealName,
}

/// A persisted document could not be turned back into a value.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("no document stored under key '{0}'")]
    Missing(String),
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Unreadable(#[from] StorageError),
}

/// Failure reading or writing the key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Meal plan generation was given a table it cannot draw from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("no meal suggestions available for {0}")]
    EmptySuggestions(MealSlot),
}

/// Errors surfaced by the planner's command interface.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A day or meal-slot label that is not part of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{label}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}
