//! Report filtering.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::features::tasks::Task;

/// Selects the completed tasks a report covers.
///
/// The date range is inclusive and compared against the local date of
/// `completed_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    /// Category, `None` or "all" for every category
    pub category: Option<String>,
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    /// Filter covering a single day.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            category: None,
            from: Some(date),
            to: Some(date),
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Whether a task is included.
    pub fn matches<Tz: TimeZone>(&self, task: &Task, tz: &Tz) -> bool {
        let Some(completed_at) = task.completed_at.filter(|_| task.completed) else {
            return false;
        };

        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("all"))
            .map_or(true, |c| task.category == c);
        if !category_ok {
            return false;
        }

        let date = completed_at.with_timezone(tz).date_naive();
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Tasks included by this filter.
    pub fn apply<'a, Tz: TimeZone>(&self, tasks: &'a [Task], tz: &Tz) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t, tz)).collect()
    }

    /// Short description for report headers.
    #[must_use]
    pub fn describe(&self) -> String {
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("all"))
            .unwrap_or("All categories");

        match (self.from, self.to) {
            (None, None) => format!("{category}, all time"),
            (Some(from), Some(to)) if from == to => format!("{category}, {from}"),
            (Some(from), Some(to)) => format!("{category}, {from} to {to}"),
            (Some(from), None) => format!("{category}, since {from}"),
            (None, Some(to)) => format!("{category}, until {to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn task(category: &str, completed_at: Option<&str>) -> Task {
        let completed_at = completed_at.map(|s| s.parse::<DateTime<Utc>>().unwrap());
        Task {
            id: "id".to_string(),
            title: "T".to_string(),
            estimated_minutes: 0.0,
            actual_minutes: 0.0,
            category: category.to_string(),
            completed: completed_at.is_some(),
            completed_at,
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_incomplete_tasks_never_match() {
        let filter = ReportFilter::default();
        assert!(!filter.matches(&task("Work", None), &Utc));

        let mut stale = task("Work", Some("2024-03-01T10:00:00Z"));
        stale.completed = false;
        assert!(!filter.matches(&stale, &Utc));
    }

    #[test]
    fn test_range_is_inclusive() {
        let filter = ReportFilter {
            category: None,
            from: Some(date("2024-03-01")),
            to: Some(date("2024-03-02")),
        };

        assert!(filter.matches(&task("Work", Some("2024-03-01T00:00:00Z")), &Utc));
        assert!(filter.matches(&task("Work", Some("2024-03-02T23:59:59Z")), &Utc));
        assert!(!filter.matches(&task("Work", Some("2024-03-03T00:00:00Z")), &Utc));
        assert!(!filter.matches(&task("Work", Some("2024-02-29T23:59:59Z")), &Utc));
    }

    #[test]
    fn test_category() {
        let tasks = vec![
            task("Work", Some("2024-03-01T10:00:00Z")),
            task("Personal", Some("2024-03-01T10:00:00Z")),
        ];

        let work = ReportFilter::default().with_category(Some("Work".to_string()));
        assert_eq!(work.apply(&tasks, &Utc).len(), 1);

        let all = ReportFilter::default().with_category(Some("all".to_string()));
        assert_eq!(all.apply(&tasks, &Utc).len(), 2);
    }

    #[test]
    fn test_uses_given_timezone() {
        let offset = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        let filter = ReportFilter::day(date("2024-03-02"));

        // 22:30 UTC on the 1st is already the 2nd at UTC+3
        let late = task("Work", Some("2024-03-01T22:30:00Z"));
        assert!(filter.matches(&late, &offset));
        assert!(!filter.matches(&late, &Utc));
    }

    #[test]
    fn test_describe() {
        assert_eq!(ReportFilter::default().describe(), "All categories, all time");
        assert_eq!(
            ReportFilter::day(date("2024-03-02"))
                .with_category(Some("Work".to_string()))
                .describe(),
            "Work, 2024-03-02"
        );
    }
}
