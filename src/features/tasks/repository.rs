//! Task persistence interface.

use super::task::{NewTask, Task, TaskQuery};
use crate::error::PromodoroError;

/// Task store used by the CLI, the dashboard, and the timer reporter.
///
/// Every `id` argument accepts a full ID or a unique prefix of one.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// Insert a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or the estimate is negative.
    fn create(&self, task: NewTask) -> Result<Task, PromodoroError>;

    /// List tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, PromodoroError>;

    /// Look up one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches and `Ambiguous` if a prefix
    /// matches several tasks.
    fn get(&self, id: &str) -> Result<Task, PromodoroError>;

    /// Flip completion, setting or clearing `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be found or updated.
    fn toggle_complete(&self, id: &str) -> Result<Task, PromodoroError>;

    /// Add worked minutes to a task.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is negative or not finite, or if the
    /// task cannot be found or updated.
    fn add_actual_minutes(&self, id: &str, minutes: f64) -> Result<Task, PromodoroError>;

    /// Delete a task. Returns false if nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails or the ID is ambiguous.
    fn delete(&self, id: &str) -> Result<bool, PromodoroError>;
}
