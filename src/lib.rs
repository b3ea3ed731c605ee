//! promodoro - a task and focus coach for the terminal
//!
//! Log tasks with time estimates, run Pomodoro, countdown-to-estimate, or
//! stopwatch focus timers against them, and review productivity reports.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::PromodoroError;
