use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "promodoro")]
#[command(about = "Task estimates, Pomodoro focus timers and productivity reports")]
#[command(long_about = "promodoro - a task and focus coach for the terminal

Log tasks with time estimates, run focus timers against them, and see how
your estimates hold up.

QUICK START:
  promodoro task add \"Write report\" -e 1h30m    Add a task with an estimate
  promodoro task list                           Show active tasks
  promodoro focus 3f2a                          Focus on a task (ID prefix)
  promodoro report today                        Today's summary
  promodoro tui                                 Open the dashboard

TIMER MODES:
  pomodoro    25 minute sprints with 5 minute breaks (default)
  est         Count down from the task's estimate
  stopwatch   Count up until stopped

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Data lives in ~/.promodoro/ unless PROMODORO_HOME is set.")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true, env = "PROMODORO_OUTPUT")]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    ///
    /// Tasks carry an estimate, a category, and the minutes logged against
    /// them by focus sessions.
    #[command(alias = "t")]
    Task(TaskArgs),

    /// Run a focus timer on a task
    ///
    /// Opens a full-screen timer bound to one task. Minutes worked are added
    /// to the task when a work session completes or is stopped.
    ///
    /// # Examples
    ///
    ///   promodoro focus 3f2a
    ///   promodoro focus 3f2a --mode est
    ///   promodoro focus history
    ///   promodoro focus popup "taskTitle=Deep%20work&time=600&running=true"
    #[command(alias = "f")]
    Focus(FocusArgs),

    /// Productivity reports
    ///
    /// Reports cover completed tasks, filtered by category and by the date
    /// they were completed.
    ///
    /// # Examples
    ///
    ///   promodoro report
    ///   promodoro report today
    ///   promodoro report graph --from 2024-03-01 --to 2024-03-31
    ///   promodoro report times -c Work
    #[command(alias = "r")]
    Report(ReportArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   promodoro completions zsh > ~/.zsh/completions/_promodoro
    ///   promodoro completions fish | source
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Open the interactive dashboard
    ///
    /// Browse tasks, toggle completion, and run focus timers.
    ///
    /// Keys: j/k move, Enter focus, x toggle done, a/c filter, q quit.
    Tui,
}

/// Arguments for task management.
#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

/// Task subcommands.
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    ///
    /// Examples:
    ///   promodoro task add "Write report" -e 1h30m
    ///   promodoro task add "Read chapter 3" -e 1.5h -c Learning
    Add {
        /// Task title
        title: String,

        /// Estimated time (e.g. 45m, 1h30m, 1.5h; bare numbers are minutes)
        #[arg(long, short = 'e', default_value = "0")]
        estimate: String,

        /// Category (defaults to `tasks.default_category`)
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// List tasks
    ///
    /// Shows active tasks by default, newest first.
    #[command(alias = "ls")]
    List {
        /// Show completed tasks only
        #[arg(long, conflicts_with = "all")]
        completed: bool,

        /// Show all tasks
        #[arg(long, short = 'a')]
        all: bool,

        /// Only tasks in this category ("all" for every category)
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Show one task
    Show {
        /// Task ID or unique prefix
        id: String,
    },

    /// Toggle a task between done and not done
    ///
    /// Marking a task not done clears its completion time.
    #[command(alias = "complete")]
    Done {
        /// Task ID or unique prefix
        id: String,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
}

/// Arguments for focus mode.
///
/// `promodoro focus <id>` starts a timer; the subcommands cover history
/// and the popup timer.
#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: Option<FocusCommands>,

    /// Task ID or unique prefix to focus on
    pub task: Option<String>,

    /// Timer mode (pomodoro, est, stopwatch)
    #[arg(long, short = 'm')]
    pub mode: Option<String>,
}

/// Focus mode subcommands.
#[derive(Subcommand)]
pub enum FocusCommands {
    /// Run a standalone popup timer
    ///
    /// Takes the query string produced by the timer's popup handoff.
    /// The popup timer never logs time.
    Popup {
        /// Query string or "/timer-popup?..." URL
        query: Option<String>,
    },

    /// View focus history
    ///
    /// Shows recently logged focus sessions.
    History {
        /// Number of sessions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,

        /// Filter by task ID or prefix
        #[arg(long, short = 't')]
        task: Option<String>,
    },

    /// Clear focus history
    ///
    /// Deletes the focus log. Task totals are kept.
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// Arguments for reports.
#[derive(Args)]
pub struct ReportArgs {
    /// Report to show
    #[arg(value_enum, default_value = "stats")]
    pub kind: ReportKind,

    /// Only tasks in this category ("all" for every category)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// First completion day to include (YYYY-MM-DD, today, yesterday)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last completion day to include (YYYY-MM-DD, today, yesterday)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

/// Available reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportKind {
    /// Work days, tasks done, hours and average per task
    #[default]
    Stats,
    /// Estimate accuracy for today (or the given range)
    Today,
    /// Hours worked per day
    Graph,
    /// Most productive hour, weekday and month
    Times,
    /// Time from creation to completion per task
    TimeSpent,
}

/// Arguments for configuration.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the data directory and file paths
    Path,
}

/// Parse a date argument: YYYY-MM-DD, "today" or "yesterday".
///
/// # Errors
///
/// Returns a message if the date cannot be parsed.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    let today = chrono::Local::now().date_naive();
    match date_str.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - chrono::Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{date_str}', expected YYYY-MM-DD")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // ==================== parse_date Tests ====================

    #[test]
    fn test_parse_date_today() {
        let expected = chrono::Local::now().date_naive();
        assert_eq!(parse_date("TODAY").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_yesterday() {
        let expected = chrono::Local::now().date_naive() - chrono::Duration::days(1);
        assert_eq!(parse_date("yesterday").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(
            parse_date("2024-12-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("next monday").is_err());
    }

    // ==================== CLI Parsing Tests ====================

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::try_parse_from(["promodoro", "tui"]).unwrap();
        assert!(cli.output.is_none());
        assert!(matches!(cli.command, Commands::Tui));
    }

    #[test]
    fn test_cli_output_format_json() {
        let cli = Cli::try_parse_from(["promodoro", "task", "list", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_cli_task_add() {
        let cli = Cli::try_parse_from([
            "promodoro",
            "task",
            "add",
            "Write report",
            "-e",
            "1h30m",
            "-c",
            "Learning",
        ])
        .unwrap();

        match cli.command {
            Commands::Task(args) => match args.command {
                TaskCommands::Add {
                    title,
                    estimate,
                    category,
                } => {
                    assert_eq!(title, "Write report");
                    assert_eq!(estimate, "1h30m");
                    assert_eq!(category.as_deref(), Some("Learning"));
                }
                _ => panic!("Expected Add command"),
            },
            _ => panic!("Expected Task command"),
        }
    }

    #[test]
    fn test_cli_task_list_flags_conflict() {
        assert!(Cli::try_parse_from(["promodoro", "task", "list", "--completed", "--all"]).is_err());
    }

    #[test]
    fn test_cli_task_alias() {
        let cli = Cli::try_parse_from(["promodoro", "t", "ls", "-a"]).unwrap();
        match cli.command {
            Commands::Task(args) => {
                assert!(matches!(args.command, TaskCommands::List { all: true, .. }));
            }
            _ => panic!("Expected Task command"),
        }
    }

    #[test]
    fn test_cli_focus_task() {
        let cli = Cli::try_parse_from(["promodoro", "focus", "3f2a", "-m", "est"]).unwrap();
        match cli.command {
            Commands::Focus(args) => {
                assert!(args.command.is_none());
                assert_eq!(args.task.as_deref(), Some("3f2a"));
                assert_eq!(args.mode.as_deref(), Some("est"));
            }
            _ => panic!("Expected Focus command"),
        }
    }

    #[test]
    fn test_cli_focus_history() {
        let cli = Cli::try_parse_from(["promodoro", "focus", "history", "-n", "5"]).unwrap();
        match cli.command {
            Commands::Focus(args) => {
                assert!(matches!(
                    args.command,
                    Some(FocusCommands::History { limit: 5, task: None })
                ));
            }
            _ => panic!("Expected Focus command"),
        }
    }

    #[test]
    fn test_cli_focus_popup() {
        let cli = Cli::try_parse_from(["promodoro", "focus", "popup", "time=60&running=true"])
            .unwrap();
        match cli.command {
            Commands::Focus(args) => match args.command {
                Some(FocusCommands::Popup { query }) => {
                    assert_eq!(query.as_deref(), Some("time=60&running=true"));
                }
                _ => panic!("Expected Popup command"),
            },
            _ => panic!("Expected Focus command"),
        }
    }

    #[test]
    fn test_cli_report_defaults() {
        let cli = Cli::try_parse_from(["promodoro", "report"]).unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.kind, ReportKind::Stats);
                assert!(args.from.is_none());
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_cli_report_range() {
        let cli = Cli::try_parse_from([
            "promodoro",
            "report",
            "time-spent",
            "--from",
            "2024-03-01",
            "--to",
            "2024-03-31",
            "-c",
            "Work",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.kind, ReportKind::TimeSpent);
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 3, 31));
                assert_eq!(args.category.as_deref(), Some("Work"));
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_cli_report_bad_date() {
        assert!(Cli::try_parse_from(["promodoro", "report", "--from", "soon"]).is_err());
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["promodoro", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }

    #[test]
    fn test_cli_config_init_force() {
        let cli = Cli::try_parse_from(["promodoro", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.command, ConfigCommands::Init { force: true }));
            }
            _ => panic!("Expected Config command"),
        }
    }
}
