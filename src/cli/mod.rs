//! Command-line interface for promodoro.

pub mod args;
pub mod commands;
