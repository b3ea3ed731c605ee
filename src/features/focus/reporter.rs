//! Timer observer that persists reported minutes.

use super::engine::{TimerMode, TimerObserver};
use super::storage::{FocusLog, FocusLogEntry};
use crate::features::tasks::TaskRepository;

/// Adds reported minutes to the task and appends a focus log entry.
///
/// Failures are logged and kept for the caller to surface; the engine
/// carries on regardless.
pub struct StoreReporter<'a> {
    tasks: &'a dyn TaskRepository,
    log: &'a FocusLog<'a>,
    mode: TimerMode,
    recorded: Vec<FocusLogEntry>,
    errors: Vec<String>,
    detached: bool,
}

impl<'a> StoreReporter<'a> {
    /// Create a reporter for a session running in `mode`.
    #[must_use]
    pub fn new(tasks: &'a dyn TaskRepository, log: &'a FocusLog<'a>, mode: TimerMode) -> Self {
        Self {
            tasks,
            log,
            mode,
            recorded: Vec::new(),
            errors: Vec::new(),
            detached: false,
        }
    }

    /// Entries recorded through this reporter.
    #[must_use]
    pub fn recorded(&self) -> &[FocusLogEntry] {
        &self.recorded
    }

    /// Failure messages collected so far.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether the engine detached during this reporter's lifetime.
    #[must_use]
    pub const fn detached(&self) -> bool {
        self.detached
    }
}

impl TimerObserver for StoreReporter<'_> {
    fn on_complete(&mut self, task_id: &str, minutes_worked: f64) {
        let task = match self.tasks.add_actual_minutes(task_id, minutes_worked) {
            Ok(task) => task,
            Err(e) => {
                log::error!("Failed to save {minutes_worked:.2} minutes for task {task_id}: {e}");
                self.errors.push(format!("Could not save focus time: {e}"));
                return;
            }
        };

        let mut entry = FocusLogEntry::new(&task.id, &task.title, self.mode, minutes_worked);
        if let Err(e) = self.log.record(&mut entry) {
            log::error!("Failed to record focus session for task {task_id}: {e}");
            self.errors.push(format!("Could not record focus session: {e}"));
        }
        log::info!("Logged {minutes_worked:.2} minutes on task {}", task.id);
        self.recorded.push(entry);
    }

    fn on_detach(&mut self) {
        self.detached = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromodoroError;
    use crate::features::focus::engine::{AttachedTask, TimerDurations, TimerEngine};
    use crate::features::tasks::{MockTaskRepository, NewTask, Task, TaskStore};
    use crate::storage::Database;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn task(id: &str, actual: f64) -> Task {
        Task {
            id: id.to_string(),
            title: "Mocked".to_string(),
            estimated_minutes: 10.0,
            actual_minutes: actual,
            category: "Work".to_string(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reports_through_repository() {
        let db = Database::open_in_memory().unwrap();
        let log = FocusLog::with_database(&db);
        let mut repo = MockTaskRepository::new();
        repo.expect_add_actual_minutes()
            .with(eq("t1"), eq(1.5))
            .times(1)
            .returning(|id, m| Ok(task(id, m)));

        let mut reporter = StoreReporter::new(&repo, &log, TimerMode::Stopwatch);
        reporter.on_complete("t1", 1.5);
        reporter.on_detach();

        assert!(reporter.errors().is_empty());
        assert!(reporter.detached());
        assert_eq!(reporter.recorded().len(), 1);
        assert_eq!(log.for_task("t1").unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_is_collected() {
        let db = Database::open_in_memory().unwrap();
        let log = FocusLog::with_database(&db);
        let mut repo = MockTaskRepository::new();
        repo.expect_add_actual_minutes()
            .returning(|id, _| Err(PromodoroError::NotFound(id.to_string())));

        let mut reporter = StoreReporter::new(&repo, &log, TimerMode::Pomodoro);
        reporter.on_complete("gone", 25.0);

        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.recorded().is_empty());
        assert!(log.recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_engine_stop_updates_task() {
        let db = Database::open_in_memory().unwrap();
        let store = TaskStore::with_database(&db);
        let log = FocusLog::with_database(&db);
        let created = store.create(NewTask::new("Real", 30.0, "Work")).unwrap();

        let mut engine = TimerEngine::new(TimerDurations::default());
        engine.attach(
            Some(AttachedTask {
                id: created.id.clone(),
                title: created.title.clone(),
                estimated_minutes: created.estimated_minutes,
            }),
            TimerMode::Pomodoro,
        );
        engine.toggle_run();

        let mut reporter = StoreReporter::new(&store, &log, TimerMode::Pomodoro);
        for _ in 0..120 {
            engine.tick(&mut reporter);
        }
        engine.stop(&mut reporter);

        assert!(reporter.detached());
        let updated = store.get(&created.id).unwrap();
        assert!((updated.actual_minutes - 2.0).abs() < f64::EPSILON);
        assert_eq!(log.for_task(&created.id).unwrap()[0].mode, TimerMode::Pomodoro);
    }
}
