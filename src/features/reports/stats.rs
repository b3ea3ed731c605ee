//! Productivity calculations over completed tasks.
//!
//! Every calculator takes already-filtered tasks (see
//! [`ReportFilter`](super::ReportFilter)) and ignores any task without a
//! completion timestamp.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::features::focus::format_hms;
use crate::features::tasks::Task;

/// Placeholder shown when there is nothing to rank.
pub const NOT_AVAILABLE: &str = "N/A";

fn completed<'a>(tasks: &'a [&'a Task]) -> impl Iterator<Item = (&'a Task, DateTime<Utc>)> + 'a {
    tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at.map(|at| (*t, at)))
}

/// Overall productivity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityStats {
    /// Distinct local dates with at least one completion
    pub total_work_days: usize,
    /// Completed tasks
    pub tasks_done: usize,
    /// Worked hours across completed tasks
    pub total_hours: f64,
    /// Worked minutes per completed task
    pub avg_minutes_per_task: f64,
}

impl ProductivityStats {
    /// Calculate from filtered tasks.
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate<Tz: TimeZone>(tasks: &[&Task], tz: &Tz) -> Self {
        let mut days = HashSet::new();
        let mut tasks_done = 0;
        let mut total_minutes = 0.0;

        for (task, at) in completed(tasks) {
            days.insert(at.with_timezone(tz).date_naive());
            tasks_done += 1;
            total_minutes += task.actual_minutes;
        }

        Self {
            total_work_days: days.len(),
            tasks_done,
            total_hours: total_minutes / 60.0,
            avg_minutes_per_task: if tasks_done > 0 {
                total_minutes / tasks_done as f64
            } else {
                0.0
            },
        }
    }
}

/// Estimate accuracy over a set of completed tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Completed tasks
    pub tasks_completed: usize,
    /// Worked hours
    pub focus_hours: f64,
    /// Estimated hours
    pub estimated_hours: f64,
    /// Worked as a percentage of estimated; 0 when nothing was estimated
    pub accuracy_percent: f64,
    /// Worked more than estimated
    pub over_estimate: bool,
    /// Absolute gap between worked and estimated, in hours
    pub difference_hours: f64,
}

impl DailySummary {
    /// Calculate from filtered tasks.
    #[must_use]
    pub fn calculate(tasks: &[&Task]) -> Self {
        let mut tasks_completed = 0;
        let mut estimated = 0.0;
        let mut actual = 0.0;

        for (task, _) in completed(tasks) {
            tasks_completed += 1;
            estimated += task.estimated_minutes;
            actual += task.actual_minutes;
        }

        Self {
            tasks_completed,
            focus_hours: actual / 60.0,
            estimated_hours: estimated / 60.0,
            accuracy_percent: if estimated > 0.0 {
                actual / estimated * 100.0
            } else {
                0.0
            },
            over_estimate: actual > estimated,
            difference_hours: (actual - estimated).abs() / 60.0,
        }
    }
}

/// Hours worked on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProductivity {
    /// Local date
    pub date: NaiveDate,
    /// Worked hours on tasks completed that day
    pub hours: f64,
}

impl DailyProductivity {
    /// Per-day totals, oldest first.
    pub fn calculate_all<Tz: TimeZone>(tasks: &[&Task], tz: &Tz) -> Vec<Self> {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (task, at) in completed(tasks) {
            *by_date.entry(at.with_timezone(tz).date_naive()).or_default() +=
                task.actual_minutes / 60.0;
        }

        by_date
            .into_iter()
            .map(|(date, hours)| Self { date, hours })
            .collect()
    }
}

/// Most common completion hour, weekday and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductiveTimes {
    /// Hour range like "14:00 - 15:00"
    pub hour: String,
    /// Weekday name
    pub day: String,
    /// Month name
    pub month: String,
}

impl ProductiveTimes {
    /// Calculate from filtered tasks.
    pub fn calculate<Tz: TimeZone>(tasks: &[&Task], tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let local: Vec<_> = completed(tasks).map(|(_, at)| at.with_timezone(tz)).collect();

        let hour = most_frequent(local.iter().map(Timelike::hour))
            .map_or_else(|| NOT_AVAILABLE.to_string(), |h| format!("{h}:00 - {}:00", h + 1));
        let day = most_frequent(local.iter().map(|t| t.format("%A").to_string()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let month = most_frequent(local.iter().map(|t| t.format("%B").to_string()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self { hour, day, month }
    }
}

/// Most frequent value. On a tie the value that reached the count first wins.
fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: std::hash::Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut best: Option<(T, usize)> = None;

    for value in values {
        let count = counts.entry(value.clone()).or_default();
        *count += 1;
        if best.as_ref().map_or(true, |(_, max)| *count > *max) {
            best = Some((value, *count));
        }
    }

    best.map(|(value, _)| value)
}

/// Time from creation to completion for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpentEntry {
    /// Task ID
    pub task_id: String,
    /// Task title
    pub title: String,
    /// Category
    pub category: String,
    /// Estimate in minutes
    pub estimated_minutes: f64,
    /// Worked minutes
    pub actual_minutes: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Completion time
    pub completed_at: DateTime<Utc>,
    /// Seconds between creation and completion
    pub elapsed_seconds: i64,
    /// Elapsed time as "{h}h {m}m {s}s"
    pub elapsed: String,
}

impl TimeSpentEntry {
    /// One entry per completed task, in input order.
    #[must_use]
    pub fn calculate_all(tasks: &[&Task]) -> Vec<Self> {
        completed(tasks)
            .map(|(task, completed_at)| {
                let elapsed_seconds = (completed_at - task.created_at).num_seconds().max(0);
                Self {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    category: task.category.clone(),
                    estimated_minutes: task.estimated_minutes,
                    actual_minutes: task.actual_minutes,
                    created_at: task.created_at,
                    completed_at,
                    elapsed_seconds,
                    elapsed: format_hms(elapsed_seconds),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(id: &str, est: f64, actual: f64, completed_at: &str) -> Task {
        let completed_at: DateTime<Utc> = completed_at.parse().unwrap();
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            estimated_minutes: est,
            actual_minutes: actual,
            category: "Work".to_string(),
            completed: true,
            completed_at: Some(completed_at),
            created_at: completed_at - chrono::Duration::seconds(3725),
        }
    }

    fn refs(tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().collect()
    }

    #[test]
    fn test_productivity_stats() {
        let tasks = vec![
            done("a", 30.0, 60.0, "2024-03-01T09:00:00Z"),
            done("b", 30.0, 30.0, "2024-03-01T15:00:00Z"),
            done("c", 60.0, 90.0, "2024-03-04T10:00:00Z"),
        ];

        let stats = ProductivityStats::calculate(&refs(&tasks), &Utc);

        assert_eq!(stats.total_work_days, 2);
        assert_eq!(stats.tasks_done, 3);
        assert!((stats.total_hours - 3.0).abs() < f64::EPSILON);
        assert!((stats.avg_minutes_per_task - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_productivity_stats_empty() {
        let stats = ProductivityStats::calculate(&[], &Utc);
        assert_eq!(stats.tasks_done, 0);
        assert!((stats.avg_minutes_per_task).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_summary() {
        let tasks = vec![
            done("a", 60.0, 90.0, "2024-03-01T09:00:00Z"),
            done("b", 60.0, 60.0, "2024-03-01T10:00:00Z"),
        ];

        let summary = DailySummary::calculate(&refs(&tasks));

        assert_eq!(summary.tasks_completed, 2);
        assert!((summary.focus_hours - 2.5).abs() < f64::EPSILON);
        assert!((summary.estimated_hours - 2.0).abs() < f64::EPSILON);
        assert!((summary.accuracy_percent - 125.0).abs() < f64::EPSILON);
        assert!(summary.over_estimate);
        assert!((summary.difference_hours - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_summary_zero_estimate() {
        let tasks = vec![done("a", 0.0, 15.0, "2024-03-01T09:00:00Z")];
        let summary = DailySummary::calculate(&refs(&tasks));

        assert!((summary.accuracy_percent).abs() < f64::EPSILON);
        assert!(summary.over_estimate);
    }

    #[test]
    fn test_daily_productivity_sorted_by_date() {
        let tasks = vec![
            done("a", 0.0, 60.0, "2024-03-04T09:00:00Z"),
            done("b", 0.0, 30.0, "2024-03-01T09:00:00Z"),
            done("c", 0.0, 30.0, "2024-03-01T18:00:00Z"),
        ];

        let days = DailyProductivity::calculate_all(&refs(&tasks), &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-03-01".parse::<NaiveDate>().unwrap());
        assert!((days[0].hours - 1.0).abs() < f64::EPSILON);
        assert!((days[1].hours - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_productive_times() {
        let tasks = vec![
            // Friday
            done("a", 0.0, 0.0, "2024-03-01T14:10:00Z"),
            done("b", 0.0, 0.0, "2024-03-01T14:50:00Z"),
            // Monday
            done("c", 0.0, 0.0, "2024-03-04T09:00:00Z"),
        ];

        let times = ProductiveTimes::calculate(&refs(&tasks), &Utc);

        assert_eq!(times.hour, "14:00 - 15:00");
        assert_eq!(times.day, "Friday");
        assert_eq!(times.month, "March");
    }

    #[test]
    fn test_productive_times_tie_goes_to_first() {
        let tasks = vec![
            done("a", 0.0, 0.0, "2024-03-04T09:00:00Z"),
            done("b", 0.0, 0.0, "2024-03-01T23:00:00Z"),
        ];

        let times = ProductiveTimes::calculate(&refs(&tasks), &Utc);

        assert_eq!(times.hour, "9:00 - 10:00");
        assert_eq!(times.day, "Monday");
    }

    #[test]
    fn test_productive_times_empty() {
        let times = ProductiveTimes::calculate(&[], &Utc);
        assert_eq!(times.hour, NOT_AVAILABLE);
        assert_eq!(times.day, NOT_AVAILABLE);
        assert_eq!(times.month, NOT_AVAILABLE);
    }

    #[test]
    fn test_time_spent() {
        let tasks = vec![done("a", 0.0, 0.0, "2024-03-01T14:10:00Z")];

        let entries = TimeSpentEntry::calculate_all(&refs(&tasks));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].elapsed_seconds, 3725);
        assert_eq!(entries[0].elapsed, "1h 2m 5s");
    }
}
