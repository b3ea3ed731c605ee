//! `SQLite` task store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, OptionalExtension, Row};
use uuid::Uuid;

use super::repository::TaskRepository;
use super::task::{NewTask, Task, TaskQuery, TaskStatus};
use crate::error::PromodoroError;
use crate::storage::Database;

const TASK_COLUMNS: &str = "id, title, estimated_minutes, actual_minutes, category, completed, completed_at, created_at";

/// Task store backed by the local database.
#[derive(Debug)]
pub struct TaskStore<'a> {
    db: &'a Database,
}

impl<'a> TaskStore<'a> {
    /// Create a store over an open database.
    #[must_use]
    pub const fn with_database(db: &'a Database) -> Self {
        Self { db }
    }

    /// Resolve a full ID or unique prefix to a full ID.
    fn resolve_id(&self, id: &str) -> Result<String, PromodoroError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PromodoroError::InvalidInput("Task ID is empty".to_string()));
        }

        let conn = self.db.connection();
        let exact: Option<String> = conn
            .query_row("SELECT id FROM tasks WHERE id = ?1", [id], |row| row.get(0))
            .optional()
            .map_err(|e| PromodoroError::Database(format!("Failed to query task: {e}")))?;
        if let Some(found) = exact {
            return Ok(found);
        }

        let mut stmt = conn
            .prepare("SELECT id FROM tasks WHERE substr(id, 1, length(?1)) = ?1 LIMIT 2")
            .map_err(|e| PromodoroError::Database(format!("Failed to prepare query: {e}")))?;
        let matches = stmt
            .query_map([id], |row| row.get::<_, String>(0))
            .map_err(|e| PromodoroError::Database(format!("Failed to query tasks: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PromodoroError::Database(e.to_string()))?;

        match matches.as_slice() {
            [] => Err(PromodoroError::NotFound(format!("Task '{id}'"))),
            [only] => Ok(only.clone()),
            _ => {
                let count: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM tasks WHERE substr(id, 1, length(?1)) = ?1",
                        [id],
                        |row| row.get(0),
                    )
                    .map_err(|e| PromodoroError::Database(format!("Failed to count tasks: {e}")))?;
                Err(PromodoroError::Ambiguous {
                    prefix: id.to_string(),
                    count: usize::try_from(count).unwrap_or(usize::MAX),
                })
            }
        }
    }

    fn fetch(&self, id: &str) -> Result<Task, PromodoroError> {
        self.db
            .connection()
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .optional()
            .map_err(|e| PromodoroError::Database(format!("Failed to query task: {e}")))?
            .ok_or_else(|| PromodoroError::NotFound(format!("Task '{id}'")))
    }
}

impl TaskRepository for TaskStore<'_> {
    fn create(&self, task: NewTask) -> Result<Task, PromodoroError> {
        let title = task.title.trim();
        if title.is_empty() {
            return Err(PromodoroError::InvalidInput(
                "Task title cannot be empty".to_string(),
            ));
        }
        if !task.estimated_minutes.is_finite() || task.estimated_minutes < 0.0 {
            return Err(PromodoroError::InvalidInput(format!(
                "Estimate must be a non-negative number of minutes, got {}",
                task.estimated_minutes
            )));
        }

        let category = task.category.trim();
        let created = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            estimated_minutes: task.estimated_minutes,
            actual_minutes: 0.0,
            category: category.to_string(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        };

        self.db
            .connection()
            .execute(
                r"INSERT INTO tasks
                  (id, title, estimated_minutes, actual_minutes, category, completed, completed_at, created_at)
                  VALUES (?1, ?2, ?3, 0, ?4, 0, NULL, ?5)",
                params![
                    created.id,
                    created.title,
                    created.estimated_minutes,
                    created.category,
                    format_timestamp(created.created_at),
                ],
            )
            .map_err(|e| PromodoroError::Database(format!("Failed to insert task: {e}")))?;

        log::debug!("Created task {} ({})", created.id, created.title);
        Ok(created)
    }

    fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, PromodoroError> {
        let completed = match query.status {
            TaskStatus::Active => Some(false),
            TaskStatus::Completed => Some(true),
            TaskStatus::All => None,
        };
        let category = query
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("all"));

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                r"SELECT {TASK_COLUMNS} FROM tasks
                  WHERE (?1 IS NULL OR completed = ?1)
                    AND (?2 IS NULL OR category = ?2)
                  ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(|e| PromodoroError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params![completed, category], row_to_task)
            .map_err(|e| PromodoroError::Database(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| PromodoroError::Database(e.to_string()))?);
        }

        Ok(tasks)
    }

    fn get(&self, id: &str) -> Result<Task, PromodoroError> {
        let id = self.resolve_id(id)?;
        self.fetch(&id)
    }

    fn toggle_complete(&self, id: &str) -> Result<Task, PromodoroError> {
        let task = self.get(id)?;
        let completed = !task.completed;
        let completed_at = completed.then(|| format_timestamp(Utc::now()));

        self.db
            .connection()
            .execute(
                "UPDATE tasks SET completed = ?1, completed_at = ?2 WHERE id = ?3",
                params![completed, completed_at, task.id],
            )
            .map_err(|e| PromodoroError::Database(format!("Failed to update task: {e}")))?;

        log::debug!("Task {} completed={completed}", task.id);
        self.fetch(&task.id)
    }

    fn add_actual_minutes(&self, id: &str, minutes: f64) -> Result<Task, PromodoroError> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(PromodoroError::InvalidInput(format!(
                "Worked minutes must be non-negative, got {minutes}"
            )));
        }

        let id = self.resolve_id(id)?;
        self.db
            .connection()
            .execute(
                "UPDATE tasks SET actual_minutes = actual_minutes + ?1 WHERE id = ?2",
                params![minutes, id],
            )
            .map_err(|e| PromodoroError::Database(format!("Failed to update task: {e}")))?;

        log::debug!("Added {minutes:.2} minutes to task {id}");
        self.fetch(&id)
    }

    fn delete(&self, id: &str) -> Result<bool, PromodoroError> {
        let id = match self.resolve_id(id) {
            Ok(id) => id,
            Err(PromodoroError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        let rows = self
            .db
            .connection()
            .execute("DELETE FROM tasks WHERE id = ?1", [&id])
            .map_err(|e| PromodoroError::Database(format!("Failed to delete task: {e}")))?;

        log::debug!("Deleted task {id}");
        Ok(rows > 0)
    }
}

/// Format a timestamp for storage. Fixed precision keeps text ordering correct.
pub(crate) fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub(crate) fn parse_timestamp(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let completed_at: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        estimated_minutes: row.get(2)?,
        actual_minutes: row.get(3)?,
        category: row.get(4)?,
        completed: row.get(5)?,
        completed_at: completed_at
            .as_deref()
            .map(|s| parse_timestamp(6, s))
            .transpose()?,
        created_at: parse_timestamp(7, &created_at)?,
    })
}
