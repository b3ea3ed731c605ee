//! Output formatting for promodoro.
//!
//! This module provides formatters for displaying tasks in various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::PromodoroError;
use crate::features::tasks::Task;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `PromodoroError::Parse` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    format: OutputFormat,
    hide_times: bool,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title, hide_times)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `PromodoroError::Parse` if JSON serialization fails.
pub fn format_task(task: &Task, format: OutputFormat) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task)),
        OutputFormat::Json => format_task_json(task),
    }
}
