//! Focus log storage.
//!
//! Every reported work session is appended to the `focus_log` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use super::engine::TimerMode;
use crate::error::PromodoroError;
use crate::features::tasks::storage::{format_timestamp, parse_timestamp};
use crate::storage::Database;

/// One reported work session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusLogEntry {
    /// Row ID, set once recorded
    pub id: Option<i64>,
    /// Task the minutes were added to
    pub task_id: String,
    /// Task title at the time of recording
    pub task_title: String,
    /// Timer mode that produced the report
    pub mode: TimerMode,
    /// Minutes worked
    pub minutes: f64,
    /// When the session ended
    pub ended_at: DateTime<Utc>,
}

impl FocusLogEntry {
    /// New entry ending now.
    pub fn new(
        task_id: impl Into<String>,
        task_title: impl Into<String>,
        mode: TimerMode,
        minutes: f64,
    ) -> Self {
        Self {
            id: None,
            task_id: task_id.into(),
            task_title: task_title.into(),
            mode,
            minutes,
            ended_at: Utc::now(),
        }
    }
}

/// Append-only log of reported focus sessions.
#[derive(Debug)]
pub struct FocusLog<'a> {
    db: &'a Database,
}

impl<'a> FocusLog<'a> {
    /// Create a log over an open database.
    #[must_use]
    pub const fn with_database(db: &'a Database) -> Self {
        Self { db }
    }

    /// Append an entry and set its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record(&self, entry: &mut FocusLogEntry) -> Result<(), PromodoroError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO focus_log (task_id, task_title, mode, minutes, ended_at)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.task_id,
                entry.task_title,
                entry.mode.as_str(),
                entry.minutes,
                format_timestamp(entry.ended_at),
            ],
        )
        .map_err(|e| PromodoroError::Database(format!("Failed to record focus session: {e}")))?;

        entry.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<FocusLogEntry>, PromodoroError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            r"SELECT id, task_id, task_title, mode, minutes, ended_at
              FROM focus_log
              ORDER BY ended_at DESC, id DESC
              LIMIT ?1",
            params![limit],
        )
    }

    /// Entries for one task, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn for_task(&self, task_id: &str) -> Result<Vec<FocusLogEntry>, PromodoroError> {
        self.query(
            r"SELECT id, task_id, task_title, mode, minutes, ended_at
              FROM focus_log
              WHERE task_id = ?1
              ORDER BY ended_at DESC, id DESC",
            params![task_id],
        )
    }

    /// Delete every entry. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<usize, PromodoroError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM focus_log", [])
            .map_err(|e| PromodoroError::Database(format!("Failed to clear focus log: {e}")))?;
        log::debug!("Cleared {rows} focus log entries");
        Ok(rows)
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<FocusLogEntry>, PromodoroError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| PromodoroError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_entry)
            .map_err(|e| PromodoroError::Database(format!("Failed to query focus log: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| PromodoroError::Database(e.to_string()))?);
        }

        Ok(entries)
    }
}

fn row_to_entry(row: &Row<'_>) -> Result<FocusLogEntry, rusqlite::Error> {
    let mode: String = row.get(3)?;
    let ended_at: String = row.get(5)?;

    Ok(FocusLogEntry {
        id: Some(row.get(0)?),
        task_id: row.get(1)?,
        task_title: row.get(2)?,
        mode: TimerMode::parse(&mode).unwrap_or_default(),
        minutes: row.get(4)?,
        ended_at: parse_timestamp(5, &ended_at)?,
    })
}
