//! Focus timer state machine.
//!
//! One engine tracks one attached task under one of three modes:
//! - Pomodoro: work sprint, auto-started break, repeat
//! - Countdown to estimate: count down the task's estimate once
//! - Stopwatch: count up until stopped
//!
//! The engine never touches storage. Worked minutes leave through a
//! [`TimerObserver`] handed to each operation that can emit them, and the
//! host drives [`TimerEngine::tick`] once per elapsed second while running.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::popup::PopupParams;

/// Default Pomodoro work sprint.
pub const WORK_SECONDS: u32 = 25 * 60;
/// Default Pomodoro break.
pub const BREAK_SECONDS: u32 = 5 * 60;

/// Timer mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    /// Alternating work sprints and breaks
    #[default]
    #[serde(rename = "pomodoro")]
    Pomodoro,
    /// Single countdown from the task's estimate
    #[serde(rename = "est", alias = "countdown")]
    CountdownToEstimate,
    /// Open-ended count up
    #[serde(rename = "stopwatch")]
    Stopwatch,
}

impl TimerMode {
    /// Parse a mode name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pomodoro" | "pomo" | "p" => Some(Self::Pomodoro),
            "est" | "estimate" | "countdown" | "e" => Some(Self::CountdownToEstimate),
            "stopwatch" | "watch" | "s" => Some(Self::Stopwatch),
            _ => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::CountdownToEstimate => "EST Countdown",
            Self::Stopwatch => "Stopwatch",
        }
    }

    /// The mode after this one, for cycling in the TUI.
    #[must_use]
    pub const fn next(&self) -> Self {
        match self {
            Self::Pomodoro => Self::CountdownToEstimate,
            Self::CountdownToEstimate => Self::Stopwatch,
            Self::Stopwatch => Self::Pomodoro,
        }
    }

    /// Short name used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::CountdownToEstimate => "est",
            Self::Stopwatch => "stopwatch",
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Work or break. Only Pomodoro ever goes on break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Working on the task
    Working,
    /// Pomodoro break
    OnBreak,
}

/// Coarse engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No task attached
    Idle,
    /// Attached, in a work phase
    Working,
    /// Attached, on a Pomodoro break
    OnBreak,
}

/// Pomodoro interval lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    /// Work sprint length in seconds
    pub work_seconds: u32,
    /// Break length in seconds
    pub break_seconds: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            work_seconds: WORK_SECONDS,
            break_seconds: BREAK_SECONDS,
        }
    }
}

impl TimerDurations {
    /// Build durations from minute values.
    #[must_use]
    pub const fn from_minutes(work: u32, brk: u32) -> Self {
        Self {
            work_seconds: work.saturating_mul(60),
            break_seconds: brk.saturating_mul(60),
        }
    }
}

/// The task the engine is timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedTask {
    /// Task ID reported back on completion
    pub id: String,
    /// Display title
    pub title: String,
    /// Estimate in minutes, used by countdown-to-estimate
    pub estimated_minutes: f64,
}

/// Receives worked minutes and detach notifications.
#[cfg_attr(test, mockall::automock)]
pub trait TimerObserver {
    /// A work session finished or was stopped after being started.
    fn on_complete(&mut self, task_id: &str, minutes_worked: f64);

    /// The engine returned to idle.
    fn on_detach(&mut self);
}

/// Observer that discards everything. Used by popup timers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TimerObserver for NullObserver {
    fn on_complete(&mut self, _task_id: &str, _minutes_worked: f64) {}

    fn on_detach(&mut self) {}
}

/// Per-attachment session state.
#[derive(Debug, Clone)]
struct Session {
    task: AttachedTask,
    mode: TimerMode,
    phase: Phase,
    remaining_seconds: u32,
    elapsed_seconds: u32,
    accumulated_seconds: u32,
    running: bool,
    session_started_at: Option<DateTime<Utc>>,
}

/// Serializable view of the engine for renderers and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    /// Coarse state
    pub state: EngineState,
    /// Attached task ID
    pub task_id: Option<String>,
    /// Attached task title
    pub task_title: Option<String>,
    /// Active mode
    pub mode: Option<TimerMode>,
    /// Seconds to display: remaining for countdowns, elapsed for stopwatch
    pub seconds: u32,
    /// Whether the clock is running
    pub running: bool,
    /// Fraction of the current interval done (0.0 - 1.0)
    pub progress: f64,
    /// When the current work session was first started
    pub session_started_at: Option<DateTime<Utc>>,
}

/// Mode-parameterized focus timer.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    durations: TimerDurations,
    session: Option<Session>,
}

impl TimerEngine {
    /// Create an idle engine.
    #[must_use]
    pub const fn new(durations: TimerDurations) -> Self {
        Self {
            durations,
            session: None,
        }
    }

    /// Seed an independent Pomodoro engine from popup parameters.
    ///
    /// The seeded engine has no started session, so it never reports. A
    /// popup without a `time` starts a full configured work sprint.
    #[must_use]
    pub fn from_popup(params: &PopupParams, durations: TimerDurations) -> Self {
        let phase = if params.on_break {
            Phase::OnBreak
        } else {
            Phase::Working
        };

        Self {
            durations,
            session: Some(Session {
                task: AttachedTask {
                    id: params.task_id.clone(),
                    title: params.task_title.clone(),
                    estimated_minutes: 0.0,
                },
                mode: TimerMode::Pomodoro,
                phase,
                remaining_seconds: params.time.unwrap_or(durations.work_seconds),
                elapsed_seconds: 0,
                accumulated_seconds: 0,
                running: params.running,
                session_started_at: None,
            }),
        }
    }

    /// Attach a task, discarding any current session.
    ///
    /// `None` leaves the engine idle.
    pub fn attach(&mut self, task: Option<AttachedTask>, mode: TimerMode) {
        self.session = task.map(|task| {
            let remaining_seconds = match mode {
                TimerMode::Pomodoro => self.durations.work_seconds,
                TimerMode::CountdownToEstimate => minutes_to_seconds(task.estimated_minutes),
                TimerMode::Stopwatch => 0,
            };
            log::debug!("Attached task {} in {} mode", task.id, mode.as_str());

            Session {
                task,
                mode,
                phase: Phase::Working,
                remaining_seconds,
                elapsed_seconds: 0,
                accumulated_seconds: 0,
                running: false,
                session_started_at: None,
            }
        });
    }

    /// Re-attach the current task under a different mode.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        let task = self.session.as_ref().map(|s| s.task.clone());
        self.attach(task, mode);
    }

    /// Start or pause the clock.
    pub fn toggle_run(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.running = !session.running;
            if session.running && session.session_started_at.is_none() {
                session.session_started_at = Some(Utc::now());
            }
        }
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self, observer: &mut dyn TimerObserver) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.running {
            return;
        }

        if session.mode == TimerMode::Stopwatch {
            session.elapsed_seconds = session.elapsed_seconds.saturating_add(1);
            return;
        }

        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds == 0 {
            self.complete(observer);
        }
    }

    /// Stop the work session, or skip the break.
    ///
    /// Stopping work reports elapsed minutes if the session was started,
    /// then detaches. Skipping a break returns to a paused full work sprint.
    pub fn stop(&mut self, observer: &mut dyn TimerObserver) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.phase == Phase::OnBreak {
            session.phase = Phase::Working;
            session.remaining_seconds = self.durations.work_seconds;
            session.running = false;
            return;
        }

        let elapsed = match session.mode {
            TimerMode::Pomodoro => self
                .durations
                .work_seconds
                .saturating_sub(session.remaining_seconds),
            TimerMode::CountdownToEstimate => {
                minutes_to_seconds(session.task.estimated_minutes)
                    .saturating_sub(session.remaining_seconds)
            }
            TimerMode::Stopwatch => session.elapsed_seconds,
        };

        if session.session_started_at.is_some() {
            let minutes = f64::from(elapsed.saturating_add(session.accumulated_seconds)) / 60.0;
            observer.on_complete(&session.task.id, minutes);
        }

        self.detach(observer);
    }

    /// Hand the current state to a popup and detach without reporting.
    pub fn handoff(&mut self, observer: &mut dyn TimerObserver) -> Option<PopupParams> {
        let session = self.session.as_ref()?;
        let params = PopupParams {
            task_id: session.task.id.clone(),
            task_title: session.task.title.clone(),
            time: Some(display_seconds(session)),
            running: session.running,
            on_break: session.phase == Phase::OnBreak,
        };
        self.detach(observer);
        Some(params)
    }

    /// Current coarse state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        match self.session.as_ref().map(|s| s.phase) {
            None => EngineState::Idle,
            Some(Phase::Working) => EngineState::Working,
            Some(Phase::OnBreak) => EngineState::OnBreak,
        }
    }

    /// Whether the clock is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.running)
    }

    /// Whether a task is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// ID of the attached task.
    #[must_use]
    pub fn task_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.task.id.as_str())
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> Option<TimerMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Remaining seconds for countdown modes.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.session
            .as_ref()
            .filter(|s| s.mode != TimerMode::Stopwatch)
            .map(|s| s.remaining_seconds)
    }

    /// Elapsed seconds for stopwatch mode.
    #[must_use]
    pub fn elapsed_seconds(&self) -> Option<u32> {
        self.session
            .as_ref()
            .filter(|s| s.mode == TimerMode::Stopwatch)
            .map(|s| s.elapsed_seconds)
    }

    /// Interval lengths in use.
    #[must_use]
    pub const fn durations(&self) -> TimerDurations {
        self.durations
    }

    /// Serializable view of the engine.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        match self.session.as_ref() {
            None => TimerSnapshot {
                state: EngineState::Idle,
                task_id: None,
                task_title: None,
                mode: None,
                seconds: 0,
                running: false,
                progress: 0.0,
                session_started_at: None,
            },
            Some(session) => TimerSnapshot {
                state: self.state(),
                task_id: Some(session.task.id.clone()),
                task_title: Some(session.task.title.clone()),
                mode: Some(session.mode),
                seconds: display_seconds(session),
                running: session.running,
                progress: self.progress(session),
                session_started_at: session.session_started_at,
            },
        }
    }

    /// Handle a countdown reaching zero.
    fn complete(&mut self, observer: &mut dyn TimerObserver) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match (session.mode, session.phase) {
            (TimerMode::Pomodoro, Phase::Working) => {
                if session.session_started_at.is_some() {
                    let worked = session
                        .accumulated_seconds
                        .saturating_add(self.durations.work_seconds);
                    observer.on_complete(&session.task.id, f64::from(worked) / 60.0);
                    session.accumulated_seconds = 0;
                    session.session_started_at = None;
                }
                session.phase = Phase::OnBreak;
                session.remaining_seconds = self.durations.break_seconds;
                session.running = true;
            }
            (TimerMode::Pomodoro, Phase::OnBreak) => {
                session.phase = Phase::Working;
                session.remaining_seconds = self.durations.work_seconds;
                session.running = false;
            }
            (TimerMode::CountdownToEstimate, _) => {
                if session.session_started_at.is_some() {
                    observer.on_complete(&session.task.id, session.task.estimated_minutes);
                }
                self.detach(observer);
            }
            (TimerMode::Stopwatch, _) => {}
        }
    }

    fn detach(&mut self, observer: &mut dyn TimerObserver) {
        if let Some(session) = self.session.take() {
            log::debug!("Detached task {}", session.task.id);
        }
        observer.on_detach();
    }

    #[allow(clippy::cast_precision_loss)]
    fn progress(&self, session: &Session) -> f64 {
        let total = match (session.mode, session.phase) {
            (TimerMode::Stopwatch, _) => return 0.0,
            (TimerMode::Pomodoro, Phase::Working) => self.durations.work_seconds,
            (TimerMode::Pomodoro, Phase::OnBreak) => self.durations.break_seconds,
            (TimerMode::CountdownToEstimate, _) => {
                minutes_to_seconds(session.task.estimated_minutes)
            }
        };
        if total == 0 {
            return 1.0;
        }
        (1.0 - f64::from(session.remaining_seconds) / f64::from(total)).clamp(0.0, 1.0)
    }
}

const fn display_seconds(session: &Session) -> u32 {
    match session.mode {
        TimerMode::Stopwatch => session.elapsed_seconds,
        _ => session.remaining_seconds,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn minutes_to_seconds(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
