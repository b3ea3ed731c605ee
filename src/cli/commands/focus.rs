//! Focus command implementation.
//!
//! Opens the timer on a task, runs popup timers, and shows the focus log.

use colored::Colorize;

use crate::cli::args::{FocusArgs, FocusCommands, OutputFormat};
use crate::config::Config;
use crate::error::PromodoroError;
use crate::features::focus::{format_minutes, FocusLog, FocusLogEntry, PopupParams, TimerMode};
use crate::features::tasks::{TaskRepository, TaskStore};
use crate::output::to_json;
use crate::storage::Database;
use crate::tui::{self, FocusOutcome};

/// Execute focus subcommands.
///
/// # Errors
///
/// Returns an error if the task cannot be resolved, the mode or popup query
/// is invalid, the store fails, or the terminal cannot be driven.
pub fn focus(
    db: &Database,
    config: &Config,
    args: FocusArgs,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    let log = FocusLog::with_database(db);

    match args.command {
        Some(FocusCommands::Popup { query }) => {
            let params = PopupParams::from_query(query.as_deref().unwrap_or_default())?;
            tui::run_popup(&params, config)?;
            Ok(String::new())
        }
        Some(FocusCommands::History { limit, task }) => {
            show_history(db, &log, limit, task.as_deref(), format)
        }
        Some(FocusCommands::Clear { force }) => clear_history(&log, force, format),
        None => {
            let id = args.task.ok_or_else(|| {
                PromodoroError::InvalidInput(
                    "No task given. Use: promodoro focus <task-id>".to_string(),
                )
            })?;
            let mode = resolve_mode(args.mode.as_deref(), config)?;
            let task = TaskStore::with_database(db).get(&id)?;
            if task.completed {
                return Err(PromodoroError::InvalidInput(format!(
                    "Task '{}' is already completed",
                    task.title
                )));
            }

            let outcome = tui::run_focus(db, config, &task, mode)?;
            summarize(&outcome, format)
        }
    }
}

fn resolve_mode(mode: Option<&str>, config: &Config) -> Result<TimerMode, PromodoroError> {
    mode.map_or(Ok(config.focus.default_mode), |m| {
        TimerMode::parse(m).ok_or_else(|| {
            PromodoroError::InvalidInput(format!(
                "Unknown timer mode '{m}'. Use pomodoro, est, or stopwatch"
            ))
        })
    })
}

/// Report what a timer run logged after the terminal is restored.
fn summarize(outcome: &FocusOutcome, format: OutputFormat) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Pretty => {
            let mut output = Vec::new();

            for entry in &outcome.logged {
                output.push(format!(
                    "{} Logged {} on {}",
                    "✓".green(),
                    format_minutes(entry.minutes),
                    entry.task_title.bold()
                ));
            }
            for error in &outcome.errors {
                output.push(format!("{} {error}", "✗".red()));
            }
            if let Some(params) = &outcome.handoff {
                output.push(format!(
                    "Timer handed off to {}\nContinue it with:\n  promodoro focus popup '{}'",
                    params.to_url(),
                    params.to_query()
                ));
            }
            if output.is_empty() {
                output.push("No focus time logged.".dimmed().to_string());
            }

            Ok(output.join("\n"))
        }
    }
}

/// Show recent focus sessions.
fn show_history(
    db: &Database,
    log: &FocusLog<'_>,
    limit: usize,
    task: Option<&str>,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    let entries: Vec<FocusLogEntry> = if let Some(id) = task {
        let task = TaskStore::with_database(db).get(id)?;
        log.for_task(&task.id)?.into_iter().take(limit).collect()
    } else {
        log.recent(limit)?
    };

    match format {
        OutputFormat::Json => to_json(&entries),
        OutputFormat::Pretty => {
            if entries.is_empty() {
                return Ok(
                    "No focus sessions found.\n\nStart one with: promodoro focus <task-id>"
                        .to_string(),
                );
            }

            let mut output = Vec::new();
            output.push("Focus Session History".bold().to_string());
            output.push("═".repeat(60));
            output.push(String::new());

            output.push(format!(
                "{:<17} {:>8}  {:<10} {}",
                "Ended", "Minutes", "Mode", "Task"
            ));
            output.push("─".repeat(60));

            for entry in &entries {
                let ended = entry
                    .ended_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string();
                let title: String = if entry.task_title.chars().count() > 28 {
                    let head: String = entry.task_title.chars().take(25).collect();
                    format!("{head}...")
                } else {
                    entry.task_title.clone()
                };

                output.push(format!(
                    "{:<17} {:>8.1}  {:<10} {}",
                    ended,
                    entry.minutes,
                    entry.mode.as_str(),
                    title
                ));
            }

            let total: f64 = entries.iter().map(|e| e.minutes).sum();
            output.push("─".repeat(60));
            output.push(format!(
                "{} sessions, {} total",
                entries.len(),
                format_minutes(total).cyan()
            ));

            Ok(output.join("\n"))
        }
    }
}

/// Delete the focus log.
fn clear_history(
    log: &FocusLog<'_>,
    force: bool,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    if !force {
        return Err(PromodoroError::InvalidInput(
            "This will delete all focus session history.\nUse --force to confirm.".to_string(),
        ));
    }

    let removed = log.clear()?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "removed": removed })),
        OutputFormat::Pretty => Ok(format!("Focus session history cleared ({removed} entries).")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tasks::NewTask;

    fn args(command: Option<FocusCommands>) -> FocusArgs {
        FocusArgs {
            command,
            task: None,
            mode: None,
        }
    }

    fn seeded() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let task = TaskStore::with_database(&db)
            .create(NewTask::new("Write report", 30.0, "Work"))
            .unwrap();
        let log = FocusLog::with_database(&db);
        let mut entry = FocusLogEntry::new(&task.id, &task.title, TimerMode::Pomodoro, 25.0);
        log.record(&mut entry).unwrap();
        (db, task.id)
    }

    #[test]
    fn test_history_pretty() {
        colored::control::set_override(false);
        let (db, _) = seeded();

        let out = focus(
            &db,
            &Config::default(),
            args(Some(FocusCommands::History {
                limit: 10,
                task: None,
            })),
            OutputFormat::Pretty,
        )
        .unwrap();

        assert!(out.contains("Focus Session History"));
        assert!(out.contains("Write report"));
        assert!(out.contains("pomodoro"));
        assert!(out.contains("1 sessions, 25 minutes total"));
    }

    #[test]
    fn test_history_for_task_json() {
        let (db, id) = seeded();

        let out = focus(
            &db,
            &Config::default(),
            args(Some(FocusCommands::History {
                limit: 10,
                task: Some(id[..8].to_string()),
            })),
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["mode"], "pomodoro");
    }

    #[test]
    fn test_clear_requires_force() {
        let (db, _) = seeded();
        let config = Config::default();

        let err = focus(
            &db,
            &config,
            args(Some(FocusCommands::Clear { force: false })),
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, PromodoroError::InvalidInput(_)));

        focus(
            &db,
            &config,
            args(Some(FocusCommands::Clear { force: true })),
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(FocusLog::with_database(&db).recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_focus_without_task_is_invalid() {
        let db = Database::open_in_memory().unwrap();

        let err = focus(&db, &Config::default(), args(None), OutputFormat::Pretty).unwrap_err();

        assert!(matches!(err, PromodoroError::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_mode() {
        let mut config = Config::default();
        config.focus.default_mode = TimerMode::Stopwatch;

        assert_eq!(resolve_mode(None, &config).unwrap(), TimerMode::Stopwatch);
        assert_eq!(
            resolve_mode(Some("est"), &config).unwrap(),
            TimerMode::CountdownToEstimate
        );
        assert!(resolve_mode(Some("lap"), &config).is_err());
    }

    #[test]
    fn test_summarize_handoff() {
        colored::control::set_override(false);
        let outcome = FocusOutcome {
            logged: Vec::new(),
            handoff: Some(PopupParams::from_query("taskId=t1&time=60").unwrap()),
            errors: Vec::new(),
        };

        let out = summarize(&outcome, OutputFormat::Pretty).unwrap();

        assert!(out.contains("promodoro focus popup 'taskId=t1&taskTitle=Focus%20Time&time=60"));
    }

    #[test]
    fn test_summarize_handoff_quotes_apostrophe_title() {
        colored::control::set_override(false);
        let outcome = FocusOutcome {
            logged: Vec::new(),
            handoff: Some(PopupParams::from_query("taskTitle=Bob's%20report&time=60").unwrap()),
            errors: Vec::new(),
        };

        let out = summarize(&outcome, OutputFormat::Pretty).unwrap();

        let hint = out.lines().last().unwrap().trim();
        let quoted = hint.strip_prefix("promodoro focus popup '").unwrap();
        let query = quoted.strip_suffix('\'').unwrap();
        assert!(!query.contains('\''));
        assert_eq!(
            PopupParams::from_query(query).unwrap().task_title,
            "Bob's report"
        );
    }
}
