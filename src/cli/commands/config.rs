//! Config command implementation.

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::PromodoroError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be written or serialized.
pub fn config(
    paths: &Paths,
    config: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => config.to_yaml(),
        },
        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(PromodoroError::Config(format!(
                    "Config file already exists at {}\nUse --force to overwrite.",
                    paths.config_file.display()
                )));
            }

            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            log::info!("Wrote default config to {}", paths.config_file.display());

            match format {
                OutputFormat::Json => to_json(&serde_json::json!({
                    "config_file": paths.config_file,
                })),
                OutputFormat::Pretty => Ok(format!(
                    "{} Wrote default config to {}",
                    "✓".green(),
                    paths.config_file.display()
                )),
            }
        }
        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "root": paths.root,
                "config_file": paths.config_file,
                "database": paths.database,
            })),
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
        },
    }
}
