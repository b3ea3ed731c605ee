//! Configuration settings for promodoro.
//!
//! Settings are loaded from `~/.promodoro/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::PromodoroError;
use crate::features::focus::{TimerDurations, TimerMode};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus timer settings.
    pub focus: FocusConfig,
    /// Task list settings.
    pub tasks: TasksConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the global `colored` override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Focus timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Pomodoro work sprint in minutes.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Pomodoro break in minutes.
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Timer mode used when none is given on the command line.
    #[serde(default)]
    pub default_mode: TimerMode,
}

/// Task list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Suggested categories, shown in pickers and filters.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Category given to new tasks when none is specified.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Hide estimated/actual times in task listings.
    #[serde(default)]
    pub hide_times: bool,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_work_minutes() -> u32 {
    25
}

const fn default_break_minutes() -> u32 {
    5
}

fn default_categories() -> Vec<String> {
    ["Work", "Personal", "Learning", "Projects"]
        .iter()
        .map(|c| (*c).to_string())
        .collect()
}

fn default_category() -> String {
    "Work".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            default_mode: TimerMode::default(),
        }
    }
}

impl FocusConfig {
    /// Pomodoro interval lengths for the timer engine.
    ///
    /// Zero-length intervals are bumped to one minute.
    #[must_use]
    pub fn durations(&self) -> TimerDurations {
        TimerDurations::from_minutes(self.work_minutes.max(1), self.break_minutes.max(1))
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_category: default_category(),
            hide_times: false,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, PromodoroError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, PromodoroError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PromodoroError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            PromodoroError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), PromodoroError> {
        std::fs::write(path, self.to_yaml()?).map_err(|e| {
            PromodoroError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Serialize the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, PromodoroError> {
        serde_yaml::to_string(self)
            .map_err(|e| PromodoroError::Config(format!("Failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.focus.work_minutes, 25);
        assert_eq!(config.focus.break_minutes, 5);
        assert_eq!(config.focus.default_mode, TimerMode::Pomodoro);
        assert_eq!(config.tasks.categories.len(), 4);
        assert_eq!(config.tasks.default_category, "Work");
        assert!(!config.tasks.hide_times);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.focus.work_minutes = 50;
        config.focus.default_mode = TimerMode::Stopwatch;
        config.tasks.hide_times = true;

        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.focus.work_minutes, 50);
        assert_eq!(loaded.focus.default_mode, TimerMode::Stopwatch);
        assert!(loaded.tasks.hide_times);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
focus:
  break_minutes: 10
  default_mode: est
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.focus.break_minutes, 10);
        assert_eq!(config.focus.default_mode, TimerMode::CountdownToEstimate);
        // Defaults fill the rest
        assert_eq!(config.focus.work_minutes, 25);
        assert_eq!(config.tasks.default_category, "Work");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "focus: [not, a, map]").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_path),
            Err(PromodoroError::Config(_))
        ));
    }

    #[test]
    fn test_durations_never_zero() {
        let focus = FocusConfig {
            work_minutes: 0,
            break_minutes: 0,
            default_mode: TimerMode::Pomodoro,
        };
        let durations = focus.durations();
        assert_eq!(durations.work_seconds, 60);
        assert_eq!(durations.break_seconds, 60);
    }
}
