//! Database migrations for promodoro.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::PromodoroError;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, PromodoroError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| PromodoroError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), PromodoroError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| PromodoroError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), PromodoroError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        log::debug!("Running migration v{version}");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), PromodoroError> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(PromodoroError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: task table.
fn migrate_v1(conn: &Connection) -> Result<(), PromodoroError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            estimated_minutes REAL NOT NULL DEFAULT 0 CHECK (estimated_minutes >= 0),
            actual_minutes REAL NOT NULL DEFAULT 0 CHECK (actual_minutes >= 0),
            category TEXT NOT NULL DEFAULT 'Work',
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_created
        ON tasks(created_at);

        CREATE INDEX IF NOT EXISTS idx_tasks_completed_at
        ON tasks(completed_at);
        ",
    )
    .map_err(|e| PromodoroError::Database(format!("Migration v1 failed: {e}")))
}

/// Migration v2: focus log.
///
/// Entries outlive their task, so `task_id` is not a foreign key.
fn migrate_v2(conn: &Connection) -> Result<(), PromodoroError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id TEXT NOT NULL,
            task_title TEXT NOT NULL,
            mode TEXT NOT NULL DEFAULT 'pomodoro',
            minutes REAL NOT NULL CHECK (minutes >= 0),
            ended_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_focus_log_ended
        ON focus_log(ended_at);

        CREATE INDEX IF NOT EXISTS idx_focus_log_task
        ON focus_log(task_id);
        ",
    )
    .map_err(|e| PromodoroError::Database(format!("Migration v2 failed: {e}")))
}
