//! Task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::focus::AttachedTask;

/// Length of the short ID shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// A task with an estimate and tracked focus time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// UUID v4
    pub id: String,
    /// Display title
    pub title: String,
    /// Estimate in minutes
    pub estimated_minutes: f64,
    /// Minutes logged by focus sessions
    pub actual_minutes: f64,
    /// Category label
    pub category: String,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was last marked done
    pub completed_at: Option<DateTime<Utc>>,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// First characters of the ID, enough to address it in practice.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_ID_LEN).unwrap_or(&self.id)
    }

    /// Binding handed to the focus timer.
    #[must_use]
    pub fn to_attached(&self) -> AttachedTask {
        AttachedTask {
            id: self.id.clone(),
            title: self.title.clone(),
            estimated_minutes: self.estimated_minutes,
        }
    }

    /// Actual minus estimated minutes.
    #[must_use]
    pub fn overrun_minutes(&self) -> f64 {
        self.actual_minutes - self.estimated_minutes
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// Title (trimmed, must not be empty)
    pub title: String,
    /// Estimate in minutes
    pub estimated_minutes: f64,
    /// Category label
    pub category: String,
}

impl NewTask {
    /// Create a new task description.
    pub fn new(
        title: impl Into<String>,
        estimated_minutes: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            estimated_minutes,
            category: category.into(),
        }
    }
}

/// Completion filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not completed
    #[default]
    Active,
    /// Completed
    Completed,
    /// Everything
    All,
}

/// Listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Completion filter
    pub status: TaskStatus,
    /// Category filter; `None` or "all" matches every category
    pub category: Option<String>,
}

impl TaskQuery {
    /// Query with a status filter and no category filter.
    #[must_use]
    pub const fn status(status: TaskStatus) -> Self {
        Self {
            status,
            category: None,
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.eq_ignore_ascii_case("all"));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: "0b7e4d1c-9a55-4a8e-8b0f-3f6f7f1b2c3d".to_string(),
            title: "Write report".to_string(),
            estimated_minutes: 60.0,
            actual_minutes: 75.0,
            category: "Work".to_string(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(sample().short_id(), "0b7e4d1c");

        let mut task = sample();
        task.id = "abc".to_string();
        assert_eq!(task.short_id(), "abc");
    }

    #[test]
    fn test_to_attached() {
        let attached = sample().to_attached();
        assert_eq!(attached.title, "Write report");
        assert!((attached.estimated_minutes - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overrun() {
        assert!((sample().overrun_minutes() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_query_all_category_is_no_filter() {
        let query = TaskQuery::status(TaskStatus::All).with_category(Some("ALL".to_string()));
        assert_eq!(query.category, None);

        let query = TaskQuery::default().with_category(Some("Work".to_string()));
        assert_eq!(query.category.as_deref(), Some("Work"));
        assert_eq!(query.status, TaskStatus::Active);
    }
}
