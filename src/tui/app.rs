//! Application state for the TUI.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::Config;
use crate::error::PromodoroError;
use crate::features::focus::{
    format_minutes, EngineState, FocusLog, FocusLogEntry, NullObserver, PopupParams,
    StoreReporter, Ticker, TimerEngine, TimerMode, TimerObserver,
};
use crate::features::tasks::{Task, TaskQuery, TaskRepository, TaskStatus, TaskStore};
use crate::storage::Database;

/// Longest wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Task list
    Tasks,
    /// Focus timer
    Timer,
}

/// How the app was launched. Decides what happens when the timer detaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Full dashboard; the timer returns to the task list
    Dashboard,
    /// Timer bound to one task; the app exits with the timer
    Focus,
    /// Standalone popup timer that never logs time
    Popup,
}

/// What a focus run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FocusOutcome {
    /// Sessions logged during the run
    pub logged: Vec<FocusLogEntry>,
    /// Popup parameters if the timer was handed off
    pub handoff: Option<PopupParams>,
    /// Failed saves
    pub errors: Vec<String>,
}

struct Persistence<'a> {
    tasks: TaskStore<'a>,
    log: FocusLog<'a>,
}

/// Application state.
pub struct App<'a> {
    persistence: Option<Persistence<'a>>,
    /// Tasks shown in the list.
    pub tasks: Vec<Task>,
    /// Currently selected index.
    pub selected: usize,
    /// Completion filter for the list.
    pub view: TaskStatus,
    /// Category filter; `None` shows every category.
    pub category: Option<String>,
    categories: Vec<String>,
    /// Hide estimate and actual times in the task list.
    pub hide_times: bool,
    /// Mode used for the next focus session.
    pub mode: TimerMode,
    /// Timer engine.
    pub engine: TimerEngine,
    ticker: Ticker,
    /// Visible screen.
    pub screen: Screen,
    /// How the app was launched.
    pub launch: Launch,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Pending 'g' key for 'gg' command.
    pub pending_g: bool,
    outcome: FocusOutcome,
}

impl<'a> App<'a> {
    /// Create the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching tasks fails.
    pub fn new(db: &'a Database, config: &Config) -> Result<Self, PromodoroError> {
        let mut app = Self::empty(
            Some(Persistence {
                tasks: TaskStore::with_database(db),
                log: FocusLog::with_database(db),
            }),
            config,
            Launch::Dashboard,
        );
        app.load_tasks()?;
        app.status = Some("Press ? for help".to_string());
        Ok(app)
    }

    /// Create a timer bound to one task.
    #[must_use]
    pub fn for_task(db: &'a Database, config: &Config, task: &Task, mode: TimerMode) -> Self {
        let mut app = Self::empty(
            Some(Persistence {
                tasks: TaskStore::with_database(db),
                log: FocusLog::with_database(db),
            }),
            config,
            Launch::Focus,
        );
        app.mode = mode;
        app.tasks = vec![task.clone()];
        app.engine.attach(Some(task.to_attached()), mode);
        app.screen = Screen::Timer;
        app.status = Some("Space to start".to_string());
        app
    }

    /// Create a standalone popup timer.
    #[must_use]
    pub fn popup(params: &PopupParams, config: &Config) -> Self {
        let mut app = Self::empty(None, config, Launch::Popup);
        app.engine = TimerEngine::from_popup(params, config.focus.durations());
        app.screen = Screen::Timer;
        app
    }

    fn empty(persistence: Option<Persistence<'a>>, config: &Config, launch: Launch) -> Self {
        Self {
            persistence,
            tasks: Vec::new(),
            selected: 0,
            view: TaskStatus::Active,
            category: None,
            categories: config.tasks.categories.clone(),
            hide_times: config.tasks.hide_times,
            mode: config.focus.default_mode,
            engine: TimerEngine::new(config.focus.durations()),
            ticker: Ticker::default(),
            screen: Screen::Tasks,
            launch,
            status: None,
            should_quit: false,
            pending_g: false,
            outcome: FocusOutcome::default(),
        }
    }

    /// Consume the app, returning what the run produced.
    #[must_use]
    pub fn into_outcome(self) -> FocusOutcome {
        self.outcome
    }

    fn load_tasks(&mut self) -> Result<(), PromodoroError> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        let query = TaskQuery::status(self.view).with_category(self.category.clone());
        self.tasks = persistence.tasks.list(&query)?;

        if self.tasks.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len() - 1;
        }
        Ok(())
    }

    /// Reload tasks from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching tasks fails.
    pub fn refresh(&mut self) -> Result<(), PromodoroError> {
        self.load_tasks()?;
        self.status = Some(format!("Refreshed {} items", self.tasks.len()));
        Ok(())
    }

    /// Get the currently selected task.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.pending_g = false;
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if !self.tasks.is_empty() && self.selected < self.tasks.len() - 1 {
            self.selected += 1;
        }
        self.pending_g = false;
    }

    /// Jump to first item.
    pub fn select_first(&mut self) {
        self.selected = 0;
        self.pending_g = false;
    }

    /// Jump to last item.
    pub fn select_last(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = self.tasks.len() - 1;
        }
        self.pending_g = false;
    }

    /// Handle 'g' key for 'gg' command.
    pub fn handle_g(&mut self) {
        if self.pending_g {
            self.select_first();
        } else {
            self.pending_g = true;
            self.status = Some("g-".to_string());
        }
    }

    /// Cancel pending 'g' command.
    pub fn cancel_pending(&mut self) {
        self.pending_g = false;
    }

    /// Cycle active / completed / all.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching tasks fails.
    pub fn cycle_view(&mut self) -> Result<(), PromodoroError> {
        self.view = match self.view {
            TaskStatus::Active => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::All,
            TaskStatus::All => TaskStatus::Active,
        };
        self.selected = 0;
        self.load_tasks()
    }

    /// Cycle through configured categories, then back to all.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching tasks fails.
    pub fn cycle_category(&mut self) -> Result<(), PromodoroError> {
        let next = match &self.category {
            None => self.categories.first().cloned(),
            Some(current) => self
                .categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| self.categories.get(i + 1))
                .cloned(),
        };
        self.category = next;
        self.selected = 0;
        self.load_tasks()
    }

    /// Toggle the selected task done / not done.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn toggle_selected(&mut self) -> Result<(), PromodoroError> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        if let Some(task) = self.tasks.get(self.selected) {
            let updated = persistence.tasks.toggle_complete(&task.id)?;
            self.status = Some(if updated.completed {
                format!("Completed: {}", updated.title)
            } else {
                format!("Reopened: {}", updated.title)
            });
            self.load_tasks()?;
        }
        Ok(())
    }

    /// Open the timer on the selected task. Completed tasks are skipped.
    pub fn focus_selected(&mut self) {
        if let Some(task) = self.tasks.get(self.selected) {
            if task.completed {
                self.status = Some(format!("'{}' is already completed", task.title));
                return;
            }
            self.engine.attach(Some(task.to_attached()), self.mode);
            self.ticker.disarm();
            self.screen = Screen::Timer;
            self.status = Some(format!("{} ready, Space to start", self.mode));
        }
    }

    /// Cycle the timer mode. Resets the current session.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        if self.screen == Screen::Timer && self.launch != Launch::Popup {
            self.engine.switch_mode(self.mode);
            self.ticker.disarm();
        }
        self.status = Some(format!("Mode: {}", self.mode));
    }

    /// Start or pause the timer.
    pub fn toggle_timer(&mut self) {
        self.engine.toggle_run();
        self.ticker.sync(self.engine.is_running(), Instant::now());
        self.status = Some(if self.engine.is_running() {
            "Running".to_string()
        } else {
            "Paused".to_string()
        });
    }

    /// Stop the work session or skip the break.
    pub fn stop_timer(&mut self) {
        self.drive(|engine, observer| engine.stop(observer));
    }

    /// Hand the timer to a popup and leave the timer screen.
    pub fn handoff(&mut self) {
        if self.launch == Launch::Popup {
            return;
        }
        let mut handed = None;
        self.drive(|engine, observer| handed = engine.handoff(observer));

        if let Some(params) = handed {
            self.status = Some(format!("Popup: promodoro focus popup '{}'", params.to_query()));
            self.outcome.handoff = Some(params);
        }
    }

    /// Leave the current screen.
    ///
    /// Leaving the timer stops a started work session, which logs its time.
    pub fn back(&mut self) {
        if self.screen == Screen::Timer && self.engine.is_attached() {
            if self.engine.state() == EngineState::OnBreak {
                // Skip the break first so the stop below detaches
                self.stop_timer();
            }
            self.stop_timer();
        }
        if self.screen == Screen::Tasks || self.launch != Launch::Dashboard {
            self.should_quit = true;
        }
        self.screen = Screen::Tasks;
    }

    /// Quit from any screen, stopping the timer first.
    pub fn quit(&mut self) {
        if self.screen == Screen::Timer {
            self.back();
        }
        self.should_quit = true;
    }

    /// How long to wait for input before the next redraw.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.ticker
            .until_next(now)
            .map_or(POLL_INTERVAL, |next| next.min(POLL_INTERVAL))
    }

    /// Deliver whatever ticks are due.
    pub fn on_tick(&mut self, now: Instant) {
        let due = self.ticker.due(now);
        for _ in 0..due {
            if !self.engine.is_running() {
                break;
            }
            self.drive(|engine, observer| engine.tick(observer));
        }
        self.ticker.sync(self.engine.is_running(), now);
    }

    /// Run one engine operation with the right observer and absorb what it reported.
    fn drive(&mut self, op: impl FnOnce(&mut TimerEngine, &mut dyn TimerObserver)) {
        let mode = self.engine.mode().unwrap_or(self.mode);

        let (recorded, errors, detached) = match &self.persistence {
            Some(p) => {
                let mut reporter = StoreReporter::new(&p.tasks, &p.log, mode);
                op(&mut self.engine, &mut reporter);
                (
                    reporter.recorded().to_vec(),
                    reporter.errors().to_vec(),
                    reporter.detached(),
                )
            }
            None => {
                let mut null = NullObserver;
                op(&mut self.engine, &mut null);
                (Vec::new(), Vec::new(), !self.engine.is_attached())
            }
        };

        for entry in &recorded {
            self.status = Some(format!(
                "Logged {} on {}",
                format_minutes(entry.minutes),
                entry.task_title
            ));
        }
        if let Some(error) = errors.last() {
            self.status = Some(error.clone());
        }
        self.outcome.logged.extend(recorded);
        self.outcome.errors.extend(errors);

        if detached {
            self.ticker.disarm();
            match self.launch {
                Launch::Dashboard => {
                    self.screen = Screen::Tasks;
                    if let Err(e) = self.load_tasks() {
                        log::error!("Failed to reload tasks: {e}");
                        self.status = Some(format!("Failed to reload tasks: {e}"));
                    }
                }
                Launch::Focus | Launch::Popup => self.should_quit = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tasks::NewTask;

    fn seeded(db: &Database) -> Task {
        let store = TaskStore::with_database(db);
        store.create(NewTask::new("Other", 10.0, "Personal")).unwrap();
        store.create(NewTask::new("Write report", 30.0, "Work")).unwrap()
    }

    fn advance(app: &mut App<'_>, start: Instant, seconds: u64) {
        app.on_tick(start + Duration::from_secs(seconds));
    }

    #[test]
    fn test_dashboard_lists_active_tasks() {
        let db = Database::open_in_memory().unwrap();
        seeded(&db);

        let app = App::new(&db, &Config::default()).unwrap();

        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.selected_task().unwrap().title, "Write report");
        assert_eq!(app.screen, Screen::Tasks);
    }

    #[test]
    fn test_navigation_bounds() {
        let db = Database::open_in_memory().unwrap();
        seeded(&db);
        let mut app = App::new(&db, &Config::default()).unwrap();

        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 1);
        app.select_next();
        assert_eq!(app.selected, 1);
        app.handle_g();
        app.handle_g();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_toggle_moves_task_out_of_active_view() {
        let db = Database::open_in_memory().unwrap();
        seeded(&db);
        let mut app = App::new(&db, &Config::default()).unwrap();

        app.toggle_selected().unwrap();
        assert_eq!(app.tasks.len(), 1);

        app.cycle_view().unwrap();
        assert_eq!(app.view, TaskStatus::Completed);
        assert_eq!(app.tasks.len(), 1);
        assert!(app.tasks[0].completed);
    }

    #[test]
    fn test_category_cycle() {
        let db = Database::open_in_memory().unwrap();
        seeded(&db);
        let mut app = App::new(&db, &Config::default()).unwrap();

        app.cycle_category().unwrap();
        assert_eq!(app.category.as_deref(), Some("Work"));
        assert_eq!(app.tasks.len(), 1);

        app.cycle_category().unwrap();
        assert_eq!(app.category.as_deref(), Some("Personal"));

        for _ in 0..3 {
            app.cycle_category().unwrap();
        }
        assert_eq!(app.category, None);
        assert_eq!(app.tasks.len(), 2);
    }

    #[test]
    fn test_focus_stop_logs_time_and_returns_to_list() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        let mut config = Config::default();
        config.focus.default_mode = TimerMode::Stopwatch;
        let mut app = App::new(&db, &config).unwrap();

        app.focus_selected();
        assert_eq!(app.screen, Screen::Timer);

        app.toggle_timer();
        let start = Instant::now();
        advance(&mut app, start, 120);
        assert_eq!(app.engine.elapsed_seconds(), Some(120));

        app.stop_timer();

        assert_eq!(app.screen, Screen::Tasks);
        assert!(!app.should_quit);
        let stored = TaskStore::with_database(&db).get(&task.id).unwrap();
        assert!((stored.actual_minutes - 2.0).abs() < f64::EPSILON);
        assert_eq!(app.into_outcome().logged.len(), 1);
    }

    #[test]
    fn test_paused_time_is_not_counted() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        let mut app = App::for_task(&db, &Config::default(), &task, TimerMode::Stopwatch);

        app.toggle_timer();
        let start = Instant::now();
        advance(&mut app, start, 10);
        app.toggle_timer();
        advance(&mut app, start, 500);

        assert_eq!(app.engine.elapsed_seconds(), Some(10));
    }

    #[test]
    fn test_focus_launch_quits_when_detached() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        let mut app = App::for_task(&db, &Config::default(), &task, TimerMode::Pomodoro);

        app.stop_timer();

        assert!(app.should_quit);
        assert!(app.into_outcome().logged.is_empty());
    }

    #[test]
    fn test_handoff_records_params_without_logging() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        let mut app = App::for_task(&db, &Config::default(), &task, TimerMode::Pomodoro);

        app.toggle_timer();
        let start = Instant::now();
        advance(&mut app, start, 60);
        app.handoff();

        assert!(app.should_quit);
        let outcome = app.into_outcome();
        assert!(outcome.logged.is_empty());
        let params = outcome.handoff.unwrap();
        assert_eq!(params.task_id, task.id);
        assert_eq!(params.time, Some(25 * 60 - 60));
        assert!(params.running);
    }

    #[test]
    fn test_back_from_break_quits_without_logging_twice() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        let mut config = Config::default();
        config.focus.work_minutes = 1;
        let mut app = App::for_task(&db, &config, &task, TimerMode::Pomodoro);

        app.toggle_timer();
        let start = Instant::now();
        advance(&mut app, start, 60);
        assert_eq!(app.engine.state(), EngineState::OnBreak);

        app.back();

        assert!(app.should_quit);
        assert_eq!(app.into_outcome().logged.len(), 1);
    }

    #[test]
    fn test_popup_never_logs() {
        let params = PopupParams {
            task_id: "t".to_string(),
            task_title: "Popup".to_string(),
            time: Some(2),
            running: false,
            on_break: false,
        };
        let mut app = App::popup(&params, &Config::default());

        app.toggle_timer();
        let start = Instant::now();
        advance(&mut app, start, 2);
        assert_eq!(app.engine.state(), EngineState::OnBreak);

        app.stop_timer();
        assert_eq!(app.engine.state(), EngineState::Working);
        app.stop_timer();

        assert!(app.should_quit);
        assert!(app.into_outcome().logged.is_empty());
    }

    #[test]
    fn test_focus_skips_completed_task() {
        let db = Database::open_in_memory().unwrap();
        let task = seeded(&db);
        TaskStore::with_database(&db).toggle_complete(&task.id).unwrap();
        let mut app = App::new(&db, &Config::default()).unwrap();
        app.cycle_view().unwrap();
        assert_eq!(app.view, TaskStatus::Completed);
        assert_eq!(app.tasks.len(), 1);

        app.focus_selected();

        assert_eq!(app.screen, Screen::Tasks);
        assert_eq!(app.engine.state(), EngineState::Idle);
        assert_eq!(
            app.status.as_deref(),
            Some("'Write report' is already completed")
        );
    }

    #[test]
    fn test_popup_without_time_uses_configured_work() {
        let mut config = Config::default();
        config.focus.work_minutes = 50;
        let params = PopupParams::from_query("taskTitle=x").unwrap();

        let app = App::popup(&params, &config);

        assert_eq!(app.engine.remaining_seconds(), Some(50 * 60));
    }
}
