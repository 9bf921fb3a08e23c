use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{DeserializationError, GenerateError, UnknownLabel, ValidationError};
use crate::lenient::optional_calories;
use crate::suggestions::SuggestionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| day.label() == wanted)
            .ok_or_else(|| UnknownLabel { kind: "day", label: s.to_string() })
    }
}

/// One of the three meals of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealSlot {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.label() == wanted)
            .ok_or_else(|| UnknownLabel { kind: "meal slot", label: s.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "optional_calories", skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl Meal {
    pub fn new(name: impl Into<String>, description: impl Into<String>, calories: Option<u32>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            calories,
        }
    }
}

/// The weekly plan: day -> slot -> meal. Unassigned slots are simply absent,
/// and a day with no meals is never kept as an empty entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MealPlan {
    days: BTreeMap<Day, BTreeMap<MealSlot, Meal>>,
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a full week by drawing every slot independently and uniformly
    /// from that slot's candidates.
    ///
    /// # Arguments
    /// * `table`: Candidate meals per slot.
    /// * `rng`: Randomness source; pass a seeded rng for reproducible plans.
    ///
    /// # Returns
    /// A plan with all 21 slots filled, or an error naming the first slot with
    /// no candidates.
    pub fn generate<R: Rng + ?Sized>(table: &SuggestionTable, rng: &mut R) -> Result<Self, GenerateError> {
        let mut plan = MealPlan::new();
        for day in Day::ALL {
            for slot in MealSlot::ALL {
                let meal = table
                    .candidates(slot)
                    .choose(rng)
                    .ok_or(GenerateError::EmptySuggestions(slot))?;
                debug!(%day, %slot, meal = %meal.name, "drew meal");
                plan.days.entry(day).or_default().insert(slot, meal.clone());
            }
        }
        info!(slots = plan.filled_slots(), "generated weekly meal plan");
        Ok(plan)
    }

    /// Puts `meal` into one slot, replacing whatever was there.
    ///
    /// An empty name is rejected and the plan is left untouched.
    pub fn set_meal(&mut self, day: Day, slot: MealSlot, meal: Meal) -> Result<(), ValidationError> {
        if meal.name.is_empty() {
            return Err(ValidationError::EmptyMealName);
        }
        self.days.entry(day).or_default().insert(slot, meal);
        Ok(())
    }

    pub fn get(&self, day: Day, slot: MealSlot) -> Option<&Meal> {
        self.days.get(&day).and_then(|slots| slots.get(&slot))
    }

    /// Assigned meals of one day, in breakfast/lunch/dinner order.
    pub fn day(&self, day: Day) -> impl Iterator<Item = (MealSlot, &Meal)> {
        self.days
            .get(&day)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(slot, meal)| (*slot, meal)))
    }

    pub fn filled_slots(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_slots() == 0
    }

    /// Sum of the known calories for a day; `None` if no meal that day has any.
    /// Summed as `u64` so that any stored `u32` values add up without overflow.
    pub fn day_calories(&self, day: Day) -> Option<u64> {
        self.day(day)
            .filter_map(|(_, meal)| meal.calories)
            .fold(None, |acc, calories| Some(acc.unwrap_or(0) + u64::from(calories)))
    }

    pub fn week_calories(&self) -> Option<u64> {
        Day::ALL
            .into_iter()
            .filter_map(|day| self.day_calories(day))
            .fold(None, |acc, calories| Some(acc.unwrap_or(0) + calories))
    }

    /// JSON document stored under the `mealPlan` key.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, DeserializationError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'de> Deserialize<'de> for MealPlan {
    /// Unknown day or slot labels are skipped with a warning so the rest of a
    /// stored plan survives; a malformed meal under a known slot is an error.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut plan = MealPlan::new();

        for (day_label, slots) in raw {
            let Ok(day) = day_label.parse::<Day>() else {
                warn!(label = %day_label, "skipping unknown day in stored meal plan");
                continue;
            };
            let slots: BTreeMap<String, serde_json::Value> =
                serde_json::from_value(slots).map_err(D::Error::custom)?;
            for (slot_label, meal) in slots {
                let Ok(slot) = slot_label.parse::<MealSlot>() else {
                    warn!(%day, label = %slot_label, "skipping unknown meal slot in stored meal plan");
                    continue;
                };
                let meal: Meal = serde_json::from_value(meal).map_err(D::Error::custom)?;
                plan.days.entry(day).or_default().insert(slot, meal);
            }
        }

        Ok(plan)
    }
}
