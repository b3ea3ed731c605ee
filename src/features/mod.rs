//! Feature implementations for promodoro.
//!
//! - Tasks and their store
//! - The focus timer
//! - Productivity reports

pub mod focus;
pub mod reports;
pub mod tasks;
