//! Path resolution for promodoro configuration and data files.
//!
//! All promodoro data is stored in `~/.promodoro/` unless `PROMODORO_HOME`
//! points somewhere else:
//! - `config.yaml` - Main configuration file
//! - `promodoro.db` - SQLite database for tasks and the focus log

use std::path::PathBuf;

use crate::error::PromodoroError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "PROMODORO_HOME";

/// Paths to promodoro configuration and data.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.promodoro/`
    pub root: PathBuf,
    /// Config file: `~/.promodoro/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.promodoro/promodoro.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `PROMODORO_HOME`, falling back to the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, PromodoroError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            PromodoroError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".promodoro")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("promodoro.db"),
            root,
        }
    }

    /// Ensure the data directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PromodoroError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                PromodoroError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
