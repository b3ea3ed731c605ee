//! Terminal User Interface (TUI) for promodoro.
//!
//! Hosts the task dashboard and the focus timer. The same loop drives three
//! launch modes: the full dashboard, a timer bound to one task, and a
//! standalone popup timer. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, FocusOutcome, Launch, Screen};

use std::io;
use std::time::Instant;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::error::PromodoroError;
use crate::features::focus::{PopupParams, TimerMode};
use crate::features::tasks::Task;
use crate::storage::Database;

/// Run the task dashboard.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(db: &Database, config: &Config) -> Result<FocusOutcome, PromodoroError> {
    let mut app = App::new(db, config)?;
    with_terminal(&mut app)?;
    Ok(app.into_outcome())
}

/// Run the focus timer on one task until it detaches or the user leaves.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run_focus(
    db: &Database,
    config: &Config,
    task: &Task,
    mode: TimerMode,
) -> Result<FocusOutcome, PromodoroError> {
    let mut app = App::for_task(db, config, task, mode);
    with_terminal(&mut app)?;
    Ok(app.into_outcome())
}

/// Run a standalone popup timer seeded from handoff parameters.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run_popup(params: &PopupParams, config: &Config) -> Result<(), PromodoroError> {
    let mut app = App::popup(params, config);
    with_terminal(&mut app)
}

/// Set up the terminal, run the loop, and restore the terminal.
fn with_terminal(app: &mut App<'_>) -> Result<(), PromodoroError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| PromodoroError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| PromodoroError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| PromodoroError::Terminal(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_>,
) -> Result<(), PromodoroError> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| PromodoroError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app)? {
            match action {
                event::Action::Quit => app.quit(),
                event::Action::Back => app.back(),
                event::Action::Refresh => app.refresh()?,
                event::Action::Toggle => app.toggle_selected()?,
                event::Action::CycleView => app.cycle_view()?,
                event::Action::CycleCategory => app.cycle_category()?,
                event::Action::Focus => app.focus_selected(),
                event::Action::StartPause => app.toggle_timer(),
                event::Action::Stop => app.stop_timer(),
                event::Action::CycleMode => app.cycle_mode(),
                event::Action::Handoff => app.handoff(),
            }
        }

        app.on_tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
