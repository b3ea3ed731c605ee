//! Configuration management for promodoro.
//!
//! This module handles loading and saving configuration from `~/.promodoro/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, FocusConfig, GeneralConfig, TasksConfig};
