pub mod calories;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
mod lenient;
pub mod logging;
pub mod meal_plan;
pub mod planner;
pub mod profile;
pub mod storage;
pub mod suggestions;

pub use crate::planner::DietPlanner;
