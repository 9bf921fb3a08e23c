use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Environment variables read by `PlannerConfig::from_env`
pub const DATA_DIR_ENV_VAR: &str = "DIET_PLANNER_DATA_DIR";
pub const CHAT_DELAY_ENV_VAR: &str = "DIET_PLANNER_CHAT_DELAY_MS";
pub const RESPONSES_ENV_VAR: &str = "DIET_PLANNER_RESPONSES";

const DEFAULT_DATA_DIR: &str = "planner-data";
const DEFAULT_CHAT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Directory backing the file store.
    pub data_dir: PathBuf,
    /// Pause before a chat answer is shown.
    pub chat_delay: Duration,
    /// Optional JSON response table replacing the built-in answers.
    pub responses_path: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            chat_delay: Duration::from_millis(DEFAULT_CHAT_DELAY_MS),
            responses_path: None,
        }
    }
}

impl PlannerConfig {
    /// Loads `.env` if present, then reads the planner variables.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable lookup; unset or blank values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(DATA_DIR_ENV_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(delay) = get(CHAT_DELAY_ENV_VAR) {
            let millis: u64 = delay
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of milliseconds, got '{}'", CHAT_DELAY_ENV_VAR, delay))?;
            config.chat_delay = Duration::from_millis(millis);
        }
        config.responses_path = get(RESPONSES_ENV_VAR).map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.chat_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_values_override_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV_VAR, "/tmp/diet"),
            (CHAT_DELAY_ENV_VAR, "0"),
            (RESPONSES_ENV_VAR, "answers.json"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/diet"));
        assert_eq!(config.chat_delay, Duration::ZERO);
        assert_eq!(config.responses_path, Some(PathBuf::from("answers.json")));
    }

    #[test]
    fn test_blank_values_are_ignored_and_bad_delay_fails() {
        let config = PlannerConfig::from_lookup(lookup(&[(DATA_DIR_ENV_VAR, "  ")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));

        let err = PlannerConfig::from_lookup(lookup(&[(CHAT_DELAY_ENV_VAR, "soon")])).unwrap_err();
        assert!(err.to_string().contains(CHAT_DELAY_ENV_VAR));
    }
}
