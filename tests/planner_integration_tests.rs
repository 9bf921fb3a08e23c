use diet_planner::chat::ResponseTable;
use diet_planner::error::{InsufficientData, PlannerError, ValidationError};
use diet_planner::meal_plan::{Day, Meal, MealPlan, MealSlot};
use diet_planner::planner::DietPlanner;
use diet_planner::profile::{ActivityLevel, Goal, Profile};
use diet_planner::storage::{FileStore, KeyValueStore, MEAL_PLAN_KEY, PROFILE_KEY};
use diet_planner::suggestions::SuggestionTable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::tempdir;

fn setup_store() -> (tempfile::TempDir, FileStore) {
    let dir = tempdir().expect("create temp dir");
    let store = FileStore::new(dir.path().join("data"));
    (dir, store)
}

#[test]
fn test_state_survives_reopening_from_disk() {
    let (dir, store) = setup_store();
    let profile = Profile {
        height_cm: Some(168.0),
        weight_kg: Some(72.0),
        age_years: Some(45.0),
        activity_level: Some(ActivityLevel::Very),
        goal: Some(Goal::Maintain),
        keto: true,
        ..Default::default()
    };

    let mut planner = DietPlanner::open(store);
    planner.save_profile(profile.clone()).unwrap();
    planner.generate_plan(&mut StdRng::seed_from_u64(11)).unwrap();
    planner
        .save_meal(Day::Sunday, MealSlot::Dinner, Meal::new("Roast Chicken", "With greens", Some(640)))
        .unwrap();
    let expected_plan = planner.meal_plan().clone();
    let expected_calories = planner.daily_calories();
    drop(planner);

    let reopened = DietPlanner::open(FileStore::new(dir.path().join("data")));
    assert_eq!(reopened.profile(), Some(&profile));
    assert_eq!(reopened.meal_plan(), &expected_plan);
    assert_eq!(reopened.daily_calories(), expected_calories);
    // 720 + 1050 - 225 + 5 = 1550; * 1.725 = 2673.75
    assert_eq!(reopened.daily_calories(), Ok(2674));
}

#[test]
fn test_documents_written_by_the_browser_client_load() {
    let (_dir, mut store) = setup_store();
    store
        .set(
            PROFILE_KEY,
            r#"{"height":"180","weight":"80","age":"30","activity":"moderate","goal":"lose",
                "vegetarian":false,"vegan":false,"glutenfree":false,"keto":false,"paleo":false}"#,
        )
        .unwrap();
    store
        .set(
            MEAL_PLAN_KEY,
            r#"{"monday":{"breakfast":{"name":"Avocado Toast","calories":320,
                "description":"Whole grain toast with avocado and poached egg"}},
               "friday":{"lunch":{"name":"Leftovers","description":"","calories":""}}}"#,
        )
        .unwrap();

    let planner = DietPlanner::open(store);
    assert_eq!(planner.daily_calories(), Ok(2259));
    assert_eq!(planner.meal_plan().filled_slots(), 2);
    assert_eq!(
        planner.meal_plan().get(Day::Monday, MealSlot::Breakfast).map(|m| m.calories),
        Some(Some(320))
    );
    assert_eq!(
        planner.meal_plan().get(Day::Friday, MealSlot::Lunch).map(|m| m.name.as_str()),
        Some("Leftovers")
    );
}

#[test]
fn test_corrupt_files_mean_no_prior_state() {
    let (dir, store) = setup_store();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data").join("mealPlan.json"), "{\"monday\": 12").unwrap();
    fs::write(dir.path().join("data").join("userProfile.json"), "").unwrap();

    let mut planner = DietPlanner::open(store);
    assert!(planner.profile().is_none());
    assert!(planner.meal_plan().is_empty());
    assert_eq!(planner.daily_calories(), Err(InsufficientData));

    // the next save overwrites the corrupt document
    planner
        .save_meal(Day::Tuesday, MealSlot::Breakfast, Meal::new("Porridge", "", None))
        .unwrap();
    let stored = fs::read_to_string(dir.path().join("data").join("mealPlan.json")).unwrap();
    assert_eq!(MealPlan::from_json(&stored).unwrap(), *planner.meal_plan());
}

#[test]
fn test_empty_meal_name_keeps_file_byte_identical() {
    let (dir, store) = setup_store();
    let mut planner = DietPlanner::open(store);
    planner.generate_plan(&mut StdRng::seed_from_u64(5)).unwrap();
    let path = dir.path().join("data").join("mealPlan.json");
    let before = fs::read(&path).unwrap();

    let result = planner.save_meal(Day::Monday, MealSlot::Breakfast, Meal::new("", "oops", Some(10)));

    assert!(matches!(result, Err(PlannerError::Validation(ValidationError::EmptyMealName))));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_custom_tables_drive_generation_and_chat() {
    let (_dir, store) = setup_store();
    let suggestions = SuggestionTable::from_csv_reader(
        "slot,name,description,calories\n\
         breakfast,Porridge,Oats,300\n\
         lunch,Bean Chili,Spicy,500\n\
         dinner,Roast Veg,Tray bake,450\n"
            .as_bytes(),
    )
    .unwrap();
    let responses = ResponseTable::new([("hydration", "Drink water through the day.")], "Ask away.");

    let mut planner = DietPlanner::with_tables(store, responses, suggestions);
    let plan = planner.generate_plan(&mut StdRng::seed_from_u64(9)).unwrap();

    for day in Day::ALL {
        assert_eq!(plan.get(day, MealSlot::Breakfast).map(|m| m.name.as_str()), Some("Porridge"));
        assert_eq!(plan.get(day, MealSlot::Lunch).map(|m| m.name.as_str()), Some("Bean Chili"));
        assert_eq!(plan.get(day, MealSlot::Dinner).map(|m| m.name.as_str()), Some("Roast Veg"));
        assert_eq!(plan.day_calories(day), Some(1250));
    }
    assert_eq!(plan.week_calories(), Some(8750));

    assert_eq!(planner.ask("Any Hydration tips?"), "Drink water through the day.");
    assert_eq!(planner.ask("what foods are high in protein"), "Ask away.");
}

#[test]
fn test_regenerating_replaces_manual_edits() {
    let (_dir, store) = setup_store();
    let mut planner = DietPlanner::open(store);
    planner
        .save_meal(Day::Monday, MealSlot::Lunch, Meal::new("Homemade Pizza", "", Some(900)))
        .unwrap();

    let plan = planner.generate_plan(&mut StdRng::seed_from_u64(21)).unwrap();

    assert_eq!(plan.filled_slots(), 21);
    assert_ne!(plan.get(Day::Monday, MealSlot::Lunch).map(|m| m.name.as_str()), Some("Homemade Pizza"));
}

#[test]
fn test_stray_labels_do_not_discard_stored_meals() {
    let (_dir, mut store) = setup_store();
    store
        .set(
            MEAL_PLAN_KEY,
            r#"{"someday":{"lunch":{"name":"Mystery"}},"monday":{},
               "wednesday":{"supper":{"name":"Late Toast"},"lunch":{"name":"Falafel Wrap","calories":"480"}}}"#,
        )
        .unwrap();

    let mut planner = DietPlanner::open(store);
    assert_eq!(planner.meal_plan().filled_slots(), 1);
    assert_eq!(planner.meal_plan().day_calories(Day::Wednesday), Some(480));

    planner
        .save_meal(Day::Thursday, MealSlot::Dinner, Meal::new("Dal", "Red lentils", Some(520)))
        .unwrap();
    let stored = planner.store().get(MEAL_PLAN_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "wednesday": {"lunch": {"name": "Falafel Wrap", "description": "", "calories": 480}},
            "thursday": {"dinner": {"name": "Dal", "description": "Red lentils", "calories": 520}}
        })
    );
}
