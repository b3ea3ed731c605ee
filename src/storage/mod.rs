//! Storage layer for promodoro.
//!
//! This module provides SQLite-based persistence for:
//! - Tasks (estimates, worked minutes, completion)
//! - The focus log (reported work sessions)

mod database;
mod migrations;

pub use database::Database;
