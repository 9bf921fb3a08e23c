use anyhow::{Context, Result};
use diet_planner::calories::{CalorieBreakdown, CALORIE_PLACEHOLDER};
use diet_planner::chat::{ChatTranscript, ResponseTable};
use diet_planner::cli::{parse_args, ChatArgs, Command, PlanCommand, ProfileCommand};
use diet_planner::config::PlannerConfig;
use diet_planner::error::InsufficientData;
use diet_planner::logging::init_logging;
use diet_planner::meal_plan::{Day, MealPlan};
use diet_planner::planner::DietPlanner;
use diet_planner::profile::Profile;
use diet_planner::storage::FileStore;
use diet_planner::suggestions::SuggestionTable;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

type Planner = DietPlanner<FileStore>;

fn print_calories(breakdown: Result<CalorieBreakdown, InsufficientData>) {
    match breakdown {
        Ok(b) => {
            println!("{} calories/day", b.daily_calories);
            println!(
                "  base {:.0} x activity {} {:+.0} goal",
                b.base_estimate, b.activity_factor, b.goal_adjustment
            );
        }
        Err(_) => println!("{}", CALORIE_PLACEHOLDER),
    }
}

fn print_profile(profile: Option<&Profile>) {
    let Some(profile) = profile else {
        println!("No profile saved yet.");
        return;
    };
    let show = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    println!("Height:   {} cm", show(profile.height_cm));
    println!("Weight:   {} kg", show(profile.weight_kg));
    println!("Age:      {}", show(profile.age_years));
    println!(
        "Activity: {}",
        profile.activity_level.as_ref().map_or("-", |a| a.label())
    );
    println!("Goal:     {}", profile.goal.as_ref().map_or("-", |g| g.label()));
    let restrictions = profile.dietary_restrictions();
    if restrictions.is_empty() {
        println!("Diet:     no restrictions");
    } else {
        println!("Diet:     {}", restrictions.join(", "));
    }
}

fn print_plan(plan: &MealPlan) {
    if plan.is_empty() {
        println!("No meals planned yet. Try `plan generate`.");
        return;
    }
    for day in Day::ALL {
        let total = plan
            .day_calories(day)
            .map_or_else(String::new, |c| format!(" ({} cal)", c));
        println!("{}{}", day, total);
        for (slot, meal) in plan.day(day) {
            let calories = meal.calories.map_or_else(String::new, |c| format!(" - {} cal", c));
            println!("  {:<9} {}{}", slot, meal.name, calories);
            if !meal.description.is_empty() {
                println!("            {}", meal.description);
            }
        }
    }
    if let Some(week) = plan.week_calories() {
        println!("Week total: {} cal", week);
    }
}

/// Answers one message after the typing delay and records both sides.
async fn answer(planner: &Planner, transcript: &mut ChatTranscript, message: &str, delay: Duration) {
    let Some(question) = transcript.push_user(message).map(str::to_string) else {
        return;
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let reply = planner.ask(&question).to_string();
    transcript.push_bot(&reply);
    if let Some(last) = transcript.messages().last() {
        println!("[{}] {}", last.time_label(), last.text);
    }
}

async fn run_chat(planner: &Planner, args: ChatArgs, delay: Duration) -> Result<()> {
    if args.quick {
        for question in planner.responses().quick_questions() {
            println!("{}", question);
        }
        return Ok(());
    }

    let mut transcript = ChatTranscript::new();
    if !args.message.is_empty() {
        answer(planner, &mut transcript, &args.message.join(" "), delay).await;
        return Ok(());
    }

    println!("Ask me about nutrition. Type 'exit' to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await.context("Failed to read chat input")? else {
            break;
        };
        if line.trim() == "exit" {
            break;
        }
        answer(planner, &mut transcript, &line, delay).await;
    }
    Ok(())
}

fn load_responses(path: Option<&Path>) -> Result<ResponseTable> {
    match path {
        Some(path) => ResponseTable::load(path),
        None => Ok(ResponseTable::builtin()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    init_logging(cli_args.verbose);

    let mut config = PlannerConfig::from_env()?;
    if let Some(dir) = cli_args.data_dir {
        config.data_dir = dir;
    }
    if let Some(millis) = cli_args.chat_delay_ms {
        config.chat_delay = Duration::from_millis(millis);
    }
    if let Some(path) = cli_args.responses {
        config.responses_path = Some(path);
    }
    debug!(?config, "configuration resolved");

    let responses = load_responses(config.responses_path.as_deref())?;
    let suggestions = match &cli_args.command {
        Command::Plan(PlanCommand::Generate { suggestions: Some(path) }) => SuggestionTable::load_csv(path)?,
        _ => SuggestionTable::builtin(),
    };
    let mut planner = DietPlanner::with_tables(FileStore::new(config.data_dir.clone()), responses, suggestions);

    match cli_args.command {
        Command::Profile(ProfileCommand::Set(args)) => {
            planner.save_profile(Profile::from(args))?;
            println!("Profile saved successfully!");
            print_calories(planner.calorie_breakdown());
        }
        Command::Profile(ProfileCommand::Show) => print_profile(planner.profile()),
        Command::Calories => print_calories(planner.calorie_breakdown()),
        Command::Plan(PlanCommand::Generate { .. }) => {
            let plan = planner.generate_plan(&mut rand::thread_rng())?;
            print_plan(plan);
            println!("Meal plan generated successfully!");
        }
        Command::Plan(PlanCommand::Set(args)) => {
            planner.save_meal(args.day, args.slot, args.meal())?;
            println!("Meal saved successfully!");
        }
        Command::Plan(PlanCommand::Show) => print_plan(planner.meal_plan()),
        Command::Chat(args) => run_chat(&planner, args, config.chat_delay).await?,
    }

    Ok(())
}
