//! The planner state object and its command interface.
//!
//! Each user action is one method call. Mutations update the in-memory state
//! and are then mirrored to the key/value store.

use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::calories::{self, estimate_daily_calories, CalorieBreakdown};
use crate::chat::{respond, ResponseTable};
use crate::error::{DeserializationError, InsufficientData, PlannerError};
use crate::meal_plan::{Day, Meal, MealPlan, MealSlot};
use crate::profile::Profile;
use crate::storage::{read_json, write_json, KeyValueStore, MEAL_PLAN_KEY, PROFILE_KEY};
use crate::suggestions::SuggestionTable;

pub struct DietPlanner<S> {
    store: S,
    profile: Option<Profile>,
    meal_plan: MealPlan,
    responses: ResponseTable,
    suggestions: SuggestionTable,
}

/// Reads a stored document, treating anything unusable as "no prior state".
fn load_or_none<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match read_json(store, key) {
        Ok(value) => Some(value),
        Err(DeserializationError::Missing(_)) => None,
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable stored document");
            None
        }
    }
}

impl<S: KeyValueStore> DietPlanner<S> {
    /// Opens a planner over `store` with the built-in answers and meals.
    pub fn open(store: S) -> Self {
        Self::with_tables(store, ResponseTable::builtin(), SuggestionTable::builtin())
    }

    pub fn with_tables(store: S, responses: ResponseTable, suggestions: SuggestionTable) -> Self {
        let profile = load_or_none::<S, Profile>(&store, PROFILE_KEY);
        let meal_plan = load_or_none::<S, MealPlan>(&store, MEAL_PLAN_KEY).unwrap_or_default();
        info!(
            has_profile = profile.is_some(),
            planned_meals = meal_plan.filled_slots(),
            "planner state loaded"
        );
        Self {
            store,
            profile,
            meal_plan,
            responses,
            suggestions,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn meal_plan(&self) -> &MealPlan {
        &self.meal_plan
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replaces the whole profile and persists it.
    pub fn save_profile(&mut self, profile: Profile) -> Result<(), PlannerError> {
        let profile = self.profile.insert(profile);
        write_json(&mut self.store, PROFILE_KEY, &*profile)?;
        info!("profile saved");
        Ok(())
    }

    /// Daily calorie estimate for the saved profile.
    pub fn daily_calories(&self) -> Result<i64, InsufficientData> {
        let profile = self.profile.as_ref().ok_or(InsufficientData)?;
        estimate_daily_calories(profile)
    }

    pub fn calorie_breakdown(&self) -> Result<CalorieBreakdown, InsufficientData> {
        let profile = self.profile.as_ref().ok_or(InsufficientData)?;
        calories::calorie_breakdown(profile)
    }

    /// Replaces the whole plan with a freshly drawn week and persists it.
    pub fn generate_plan<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&MealPlan, PlannerError> {
        self.meal_plan = MealPlan::generate(&self.suggestions, rng)?;
        self.persist_plan()?;
        Ok(&self.meal_plan)
    }

    /// Saves one meal into a slot. An empty name is rejected before anything
    /// changes or is written.
    pub fn save_meal(&mut self, day: Day, slot: MealSlot, meal: Meal) -> Result<(), PlannerError> {
        self.meal_plan.set_meal(day, slot, meal)?;
        self.persist_plan()?;
        info!(%day, %slot, "meal saved");
        Ok(())
    }

    /// Canned answer for a chat message. Any typing delay is the caller's.
    pub fn ask(&self, message: &str) -> &str {
        respond(message, &self.responses)
    }

    fn persist_plan(&mut self) -> Result<(), PlannerError> {
        write_json(&mut self.store, MEAL_PLAN_KEY, &self.meal_plan)?;
        Ok(())
    }
}
