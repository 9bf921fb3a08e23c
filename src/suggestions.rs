use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::lenient::parse_optional_f64;
use crate::meal_plan::{Meal, MealSlot};

// Expected column headers
const SLOT_COL: &str = "slot";
const NAME_COL: &str = "name";
const DESCRIPTION_COL: &str = "description";
const CALORIES_COL: &str = "calories";

/// Candidate meals for each slot that plan generation draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionTable {
    slots: BTreeMap<MealSlot, Vec<Meal>>,
}

impl SuggestionTable {
    pub fn from_meals<I>(meals: I) -> Self
    where
        I: IntoIterator<Item = (MealSlot, Vec<Meal>)>,
    {
        Self {
            slots: meals.into_iter().collect(),
        }
    }

    /// Five candidates per slot.
    pub fn builtin() -> Self {
        let meal = |name: &str, calories: u32, description: &str| Meal::new(name, description, Some(calories));
        Self::from_meals([
            (
                MealSlot::Breakfast,
                vec![
                    meal("Greek Yogurt with Berries", 250, "Greek yogurt with mixed berries and honey"),
                    meal("Oatmeal with Banana", 300, "Steel-cut oats with sliced banana and almonds"),
                    meal("Avocado Toast", 320, "Whole grain toast with avocado and poached egg"),
                    meal("Smoothie Bowl", 280, "Acai smoothie bowl with granola and fruits"),
                    meal("Scrambled Eggs", 220, "Scrambled eggs with spinach and cheese"),
                ],
            ),
            (
                MealSlot::Lunch,
                vec![
                    meal("Grilled Chicken Salad", 450, "Mixed greens with grilled chicken and vinaigrette"),
                    meal("Quinoa Buddha Bowl", 420, "Quinoa with roasted vegetables and tahini dressing"),
                    meal("Turkey Wrap", 380, "Whole wheat wrap with turkey, hummus, and vegetables"),
                    meal("Lentil Soup", 350, "Hearty lentil soup with vegetables and herbs"),
                    meal("Tuna Salad", 340, "Fresh tuna salad with mixed vegetables"),
                ],
            ),
            (
                MealSlot::Dinner,
                vec![
                    meal("Salmon with Vegetables", 520, "Baked salmon with roasted seasonal vegetables"),
                    meal("Chicken Stir-Fry", 480, "Chicken stir-fry with brown rice and mixed vegetables"),
                    meal("Vegetarian Pasta", 450, "Whole wheat pasta with marinara and vegetables"),
                    meal("Lean Beef with Sweet Potato", 550, "Grilled lean beef with roasted sweet potato"),
                    meal("Fish Tacos", 420, "Grilled fish tacos with cabbage slaw"),
                ],
            ),
        ])
    }

    pub fn candidates(&self, slot: MealSlot) -> &[Meal] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Loads a replacement table from a CSV file with the columns
    /// `slot,name,description,calories`.
    pub fn load_csv(csv_path: &Path) -> Result<Self> {
        if !csv_path.exists() {
            return Err(anyhow::anyhow!("Suggestion CSV file not found at: {:?}", csv_path));
        }
        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open suggestion CSV file at {:?}", csv_path))?;
        Self::from_csv_reader(file).with_context(|| format!("Invalid suggestion CSV at {:?}", csv_path))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
        };
        let slot_idx = column(SLOT_COL)?;
        let name_idx = column(NAME_COL)?;
        let description_idx = column(DESCRIPTION_COL)?;
        let calories_idx = column(CALORIES_COL)?;

        let mut slots: BTreeMap<MealSlot, Vec<Meal>> = BTreeMap::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

            let name = record.get(name_idx).unwrap_or_default();
            if name.is_empty() {
                warn!(row = row_index + 1, "skipping suggestion row with empty name");
                continue;
            }
            let slot: MealSlot = record
                .get(slot_idx)
                .unwrap_or_default()
                .parse()
                .with_context(|| format!("Bad slot at row index {}", row_index))?;

            let calories = record
                .get(calories_idx)
                .and_then(parse_optional_f64)
                .filter(|c| c.is_finite() && *c >= 0.0)
                .map(|c| c.round() as u32);

            slots.entry(slot).or_default().push(Meal::new(
                name,
                record.get(description_idx).unwrap_or_default(),
                calories,
            ));
        }

        for slot in MealSlot::ALL {
            let count = slots.get(&slot).map_or(0, Vec::len);
            if count == 0 {
                return Err(anyhow::anyhow!("No suggestions loaded for {}", slot));
            }
            debug!(%slot, count, "loaded meal suggestions");
        }

        Ok(Self { slots })
    }
}
