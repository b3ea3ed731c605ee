//! Report command implementation.
//!
//! Renders productivity reports over completed tasks.

use chrono::{Local, TimeZone};
use colored::Colorize;
use serde_json::json;

use crate::cli::args::{OutputFormat, ReportArgs, ReportKind};
use crate::error::PromodoroError;
use crate::features::reports::{
    render_bar_chart, DailyProductivity, DailySummary, ProductiveTimes, ProductivityStats,
    ReportFilter, TimeSpentEntry,
};
use crate::features::tasks::{Task, TaskQuery, TaskRepository, TaskStatus, TaskStore};
use crate::output::{format_minutes_short, to_json};
use crate::storage::Database;

/// Execute the report command.
///
/// # Errors
///
/// Returns an error if loading tasks or output formatting fails.
pub fn report(
    db: &Database,
    args: &ReportArgs,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    let tasks = TaskStore::with_database(db).list(&TaskQuery::status(TaskStatus::Completed))?;
    let filter = build_filter(args, Local::now().date_naive());
    render(&tasks, args.kind, &filter, &Local, format)
}

/// The "today" report covers the current day unless a range is given.
fn build_filter(args: &ReportArgs, today: chrono::NaiveDate) -> ReportFilter {
    let filter = if args.kind == ReportKind::Today && args.from.is_none() && args.to.is_none() {
        ReportFilter::day(today)
    } else {
        ReportFilter {
            category: None,
            from: args.from,
            to: args.to,
        }
    };
    filter.with_category(args.category.clone())
}

fn render<Tz: TimeZone>(
    tasks: &[Task],
    kind: ReportKind,
    filter: &ReportFilter,
    tz: &Tz,
    format: OutputFormat,
) -> Result<String, PromodoroError>
where
    Tz::Offset: std::fmt::Display,
{
    let selected = filter.apply(tasks, tz);

    match kind {
        ReportKind::Stats => {
            render_stats(&ProductivityStats::calculate(&selected, tz), filter, format)
        }
        ReportKind::Today => render_today(&DailySummary::calculate(&selected), filter, format),
        ReportKind::Graph => {
            render_graph(&DailyProductivity::calculate_all(&selected, tz), filter, format)
        }
        ReportKind::Times => {
            render_times(&ProductiveTimes::calculate(&selected, tz), filter, format)
        }
        ReportKind::TimeSpent => {
            render_time_spent(&TimeSpentEntry::calculate_all(&selected), filter, format)
        }
    }
}

fn header(title: &str, filter: &ReportFilter) -> Vec<String> {
    vec![
        title.bold().to_string(),
        filter.describe().dimmed().to_string(),
        "═".repeat(60),
        String::new(),
    ]
}

fn render_stats(
    stats: &ProductivityStats,
    filter: &ReportFilter,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "filter": filter, "stats": stats })),
        OutputFormat::Pretty => {
            let mut output = header("Productivity", filter);
            output.push(format!(
                "  Work days:        {}",
                stats.total_work_days.to_string().cyan()
            ));
            output.push(format!("  Tasks done:       {}", stats.tasks_done.to_string().green()));
            output.push(format!("  Hours worked:     {:.1}", stats.total_hours));
            output.push(format!(
                "  Avg per task:     {}",
                format_minutes_short(stats.avg_minutes_per_task)
            ));
            Ok(output.join("\n"))
        }
    }
}

fn render_today(
    summary: &DailySummary,
    filter: &ReportFilter,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "filter": filter, "summary": summary })),
        OutputFormat::Pretty => {
            let mut output = header("Daily Summary", filter);
            if summary.tasks_completed == 0 {
                output.push("  No tasks completed.".to_string());
                return Ok(output.join("\n"));
            }

            output.push(format!(
                "  Tasks completed:  {}",
                summary.tasks_completed.to_string().green()
            ));
            output.push(format!("  Focus hours:      {:.1}", summary.focus_hours));
            output.push(format!("  Estimated hours:  {:.1}", summary.estimated_hours));
            output.push(format!("  Accuracy:         {:.0}%", summary.accuracy_percent));
            output.push(String::new());

            let verdict = format!(
                "{:.1}h {} estimate",
                summary.difference_hours,
                if summary.over_estimate { "over" } else { "under" }
            );
            output.push(format!(
                "  {}",
                if summary.over_estimate {
                    verdict.red()
                } else {
                    verdict.green()
                }
            ));
            Ok(output.join("\n"))
        }
    }
}

fn render_graph(
    days: &[DailyProductivity],
    filter: &ReportFilter,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "filter": filter, "days": days })),
        OutputFormat::Pretty => {
            let mut output = header("Hours Worked per Day", filter);
            if days.is_empty() {
                output.push("  No tasks completed.".to_string());
                return Ok(output.join("\n"));
            }

            let data: Vec<(String, f64)> = days
                .iter()
                .map(|d| (d.date.format("%Y-%m-%d").to_string(), d.hours))
                .collect();
            output.push(render_bar_chart(&data, 10, 40));
            Ok(output.join("\n"))
        }
    }
}

fn render_times(
    times: &ProductiveTimes,
    filter: &ReportFilter,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "filter": filter, "times": times })),
        OutputFormat::Pretty => {
            let mut output = header("Most Productive Times", filter);
            output.push(format!("  Hour:   {}", times.hour.cyan()));
            output.push(format!("  Day:    {}", times.day.cyan()));
            output.push(format!("  Month:  {}", times.month.cyan()));
            Ok(output.join("\n"))
        }
    }
}

fn render_time_spent(
    entries: &[TimeSpentEntry],
    filter: &ReportFilter,
    format: OutputFormat,
) -> Result<String, PromodoroError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "filter": filter, "tasks": entries })),
        OutputFormat::Pretty => {
            let mut output = header("Time Spent per Task", filter);
            if entries.is_empty() {
                output.push("  No tasks completed.".to_string());
                return Ok(output.join("\n"));
            }

            output.push(format!(
                "{:<30} {:<10} {:>9} {:>9}  {}",
                "Task", "Category", "Estimate", "Actual", "Created to done"
            ));
            output.push("─".repeat(60));

            for entry in entries {
                let title: String = if entry.title.chars().count() > 29 {
                    let head: String = entry.title.chars().take(26).collect();
                    format!("{head}...")
                } else {
                    entry.title.clone()
                };
                output.push(format!(
                    "{:<30} {:<10} {:>9} {:>9}  {}",
                    title,
                    entry.category,
                    format_minutes_short(entry.estimated_minutes),
                    format_minutes_short(entry.actual_minutes),
                    entry.elapsed
                ));
            }
            Ok(output.join("\n"))
        }
    }
}
