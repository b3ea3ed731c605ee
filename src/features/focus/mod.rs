//! Focus timer.
//!
//! Provides the timer engine and everything around it:
//! - Pomodoro, countdown-to-estimate, and stopwatch modes
//! - Popup handoff parameters
//! - Focus log storage and the reporter that feeds it
//! - Clock formatting and the host tick source

pub mod engine;
pub mod popup;
pub mod reporter;
pub mod storage;
pub mod ticker;
pub mod timer;

pub use engine::{
    AttachedTask, EngineState, NullObserver, Phase, TimerDurations, TimerEngine, TimerMode,
    TimerObserver, TimerSnapshot, BREAK_SECONDS, WORK_SECONDS,
};
pub use popup::PopupParams;
pub use reporter::StoreReporter;
pub use storage::{FocusLog, FocusLogEntry};
pub use ticker::Ticker;
pub use timer::{format_clock, format_hms, format_minutes, parse_duration, render_progress_bar};
