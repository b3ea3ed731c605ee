//! JSON output formatting for promodoro.

use serde::Serialize;
use serde_json::json;

use crate::error::PromodoroError;
use crate::features::tasks::Task;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `PromodoroError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str) -> Result<String, PromodoroError> {
    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single task as JSON
///
/// # Errors
///
/// Returns `PromodoroError::Parse` if JSON serialization fails.
pub fn format_task_json(task: &Task) -> Result<String, PromodoroError> {
    Ok(serde_json::to_string_pretty(task)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PromodoroError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PromodoroError> {
    Ok(serde_json::to_string_pretty(value)?)
}
