//! Command implementations for promodoro.
//!
//! This module contains the implementation of all CLI commands.

mod completions;
mod config;
mod focus;
mod report;

pub use completions::completions;
pub use config::config;
pub use focus::focus;
pub use report::report;

use colored::Colorize;

use crate::cli::args::{OutputFormat, TaskCommands};
use crate::config::Config;
use crate::error::PromodoroError;
use crate::features::focus::parse_duration;
use crate::features::tasks::{NewTask, TaskQuery, TaskRepository, TaskStatus, TaskStore};
use crate::output::{format_minutes_short, format_task, format_tasks, to_json};
use crate::storage::Database;

/// Execute task subcommands
///
/// # Errors
///
/// Returns an error if the store call fails, the input is invalid, or output
/// formatting fails.
pub fn task(
    db: &Database,
    config: &Config,
    cmd: TaskCommands,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    let store = TaskStore::with_database(db);

    match cmd {
        TaskCommands::Add {
            title,
            estimate,
            category,
        } => add_task(&store, config, &title, &estimate, category, format),
        TaskCommands::List {
            completed,
            all,
            category,
        } => {
            let status = if all {
                TaskStatus::All
            } else if completed {
                TaskStatus::Completed
            } else {
                TaskStatus::Active
            };
            let query = TaskQuery::status(status).with_category(category);
            let tasks = store.list(&query)?;

            let title = match (status, &query.category) {
                (TaskStatus::Active, None) => "Active tasks".to_string(),
                (TaskStatus::Completed, None) => "Completed tasks".to_string(),
                (TaskStatus::All, None) => "All tasks".to_string(),
                (_, Some(cat)) => format!("Tasks in {cat}"),
            };
            format_tasks(&tasks, &title, format, config.tasks.hide_times)
        }
        TaskCommands::Show { id } => {
            let task = store.get(&id)?;
            format_task(&task, format)
        }
        TaskCommands::Done { id } => {
            let task = store.toggle_complete(&id)?;
            match format {
                OutputFormat::Json => to_json(&task),
                OutputFormat::Pretty => Ok(if task.completed {
                    format!(
                        "{} Completed: {} ({} / {})",
                        "✓".green(),
                        task.title.bold(),
                        format_minutes_short(task.actual_minutes),
                        format_minutes_short(task.estimated_minutes)
                    )
                } else {
                    format!("Reopened: {}", task.title.bold())
                }),
            }
        }
        TaskCommands::Delete { id } => {
            if !store.delete(&id)? {
                return Err(PromodoroError::NotFound(format!("Task '{id}'")));
            }
            match format {
                OutputFormat::Json => to_json(&serde_json::json!({ "deleted": id })),
                OutputFormat::Pretty => Ok(format!("Deleted task: {id}")),
            }
        }
    }
}

fn add_task(
    store: &TaskStore<'_>,
    config: &Config,
    title: &str,
    estimate: &str,
    category: Option<String>,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    let minutes = parse_duration(estimate).ok_or_else(|| {
        PromodoroError::InvalidInput(format!(
            "Invalid estimate '{estimate}'. Use formats like 25, 25m, 1h30m, 1.5h"
        ))
    })?;
    let category = category.unwrap_or_else(|| config.tasks.default_category.clone());

    let task = store.create(NewTask::new(title, minutes, category))?;

    match format {
        OutputFormat::Json => to_json(&task),
        OutputFormat::Pretty => Ok(format!(
            "Created task: {} (ID: {}, estimate {}, {})",
            task.title.bold(),
            task.short_id(),
            format_minutes_short(task.estimated_minutes),
            task.category.cyan()
        )),
    }
}
