//! `SQLite` database connection.
//!
//! The database is stored at `~/.promodoro/promodoro.db` and contains the
//! `tasks` and `focus_log` tables.

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::PromodoroError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, PromodoroError> {
        let paths = Paths::new()?;
        Self::open_with_paths(&paths)
    }

    /// Open the database described by `paths`, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open_with_paths(paths: &Paths) -> Result<Self, PromodoroError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, PromodoroError> {
        let conn = Connection::open(path).map_err(|e| {
            PromodoroError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        log::debug!("Opened database {}", path.display());

        Self::from_connection(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, PromodoroError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            PromodoroError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, PromodoroError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| PromodoroError::Database(format!("Failed to enable foreign keys: {e}")))?;

        let db = Self { conn };
        migrations::run(&db.conn)?;
        Ok(db)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, PromodoroError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
