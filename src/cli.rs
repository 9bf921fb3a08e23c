use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::meal_plan::{Day, Meal, MealSlot};
use crate::profile::{ActivityLevel, Goal, Profile};

#[derive(Parser, Debug)]
#[command(author, version, about = "Weekly meal planner with calorie estimates and a nutrition chat", long_about = None)]
pub struct Cli {
    /// Directory where the profile and meal plan are stored
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Delay before chat answers appear, in milliseconds
    #[arg(long, global = true)]
    pub chat_delay_ms: Option<u64>,

    /// JSON file replacing the built-in chat answers
    #[arg(long, global = true)]
    pub responses: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save or show the body and dietary profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Show the estimated daily calorie target
    Calories,
    /// Generate, edit or show the weekly meal plan
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Ask a nutrition question; starts an interactive chat without one
    Chat(ChatArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Overwrite the saved profile
    Set(ProfileArgs),
    /// Print the saved profile
    Show,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Height in centimetres
    #[arg(long)]
    pub height: Option<f64>,
    /// Weight in kilograms
    #[arg(long)]
    pub weight: Option<f64>,
    /// Age in years
    #[arg(long)]
    pub age: Option<f64>,
    /// sedentary, light, moderate, very or extra
    #[arg(long)]
    pub activity: Option<String>,
    /// lose, gain, muscle or maintain
    #[arg(long)]
    pub goal: Option<String>,
    #[arg(long)]
    pub vegetarian: bool,
    #[arg(long)]
    pub vegan: bool,
    #[arg(long)]
    pub gluten_free: bool,
    #[arg(long)]
    pub keto: bool,
    #[arg(long)]
    pub paleo: bool,
}

impl From<ProfileArgs> for Profile {
    fn from(args: ProfileArgs) -> Self {
        Profile {
            height_cm: args.height,
            weight_kg: args.weight,
            age_years: args.age,
            activity_level: args.activity.map(ActivityLevel::from),
            goal: args.goal.map(Goal::from),
            vegetarian: args.vegetarian,
            vegan: args.vegan,
            gluten_free: args.gluten_free,
            keto: args.keto,
            paleo: args.paleo,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Fill every slot of the week with a random suggestion
    Generate {
        /// CSV of suggestions (slot,name,description,calories)
        #[arg(long)]
        suggestions: Option<PathBuf>,
    },
    /// Put a meal into one slot
    Set(MealArgs),
    /// Print the plan
    Show,
}

#[derive(Args, Debug)]
pub struct MealArgs {
    /// monday .. sunday
    pub day: Day,
    /// breakfast, lunch or dinner
    pub slot: MealSlot,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub calories: Option<u32>,
}

impl MealArgs {
    pub fn meal(&self) -> Meal {
        Meal::new(self.name.clone(), self.description.clone(), self.calories)
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// List the quick questions and exit
    #[arg(long)]
    pub quick: bool,
    /// The question; words are joined with spaces
    pub message: Vec<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_set() {
        let cli = Cli::try_parse_from([
            "diet_planner", "plan", "set", "tuesday", "dinner", "--name", "Fish Tacos", "--calories", "420",
        ])
        .unwrap();
        match cli.command {
            Command::Plan(PlanCommand::Set(args)) => {
                assert_eq!(args.day, Day::Tuesday);
                assert_eq!(args.slot, MealSlot::Dinner);
                assert_eq!(args.meal(), Meal::new("Fish Tacos", "", Some(420)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_plan_set_rejects_unknown_day() {
        assert!(Cli::try_parse_from(["diet_planner", "plan", "set", "caturday", "lunch", "--name", "x"]).is_err());
    }

    #[test]
    fn test_profile_args_become_profile() {
        let cli = Cli::try_parse_from([
            "diet_planner", "--data-dir", "/tmp/p", "profile", "set", "--height", "170", "--weight", "65",
            "--age", "33", "--activity", "light", "--goal", "muscle", "--gluten-free",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/p")));
        let Command::Profile(ProfileCommand::Set(args)) = cli.command else {
            panic!("expected profile set");
        };
        let profile = Profile::from(args);
        assert_eq!(profile.height_cm, Some(170.0));
        assert_eq!(profile.activity_level, Some(ActivityLevel::Light));
        assert_eq!(profile.goal, Some(Goal::Muscle));
        assert!(profile.gluten_free);
        assert!(!profile.vegan);
    }

    #[test]
    fn test_chat_message_words() {
        let cli = Cli::try_parse_from(["diet_planner", "chat", "low", "carb", "meal", "ideas"]).unwrap();
        let Command::Chat(args) = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(args.message.join(" "), "low carb meal ideas");
        assert!(!args.quick);
    }
}
