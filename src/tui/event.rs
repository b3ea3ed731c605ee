//! Event handling for the TUI.

use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::error::PromodoroError;
use crate::tui::app::{App, Launch, Screen};

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Leave the current screen.
    Back,
    /// Reload the task list.
    Refresh,
    /// Toggle the selected task done.
    Toggle,
    /// Cycle the completion filter.
    CycleView,
    /// Cycle the category filter.
    CycleCategory,
    /// Open the timer on the selected task.
    Focus,
    /// Start or pause the timer.
    StartPause,
    /// Stop work or skip the break.
    Stop,
    /// Cycle the timer mode.
    CycleMode,
    /// Hand the timer to a popup.
    Handoff,
}

const TASKS_HELP: &str =
    "j/k:nav | Enter:focus | x:done | v:view | c:category | m:mode | r:refresh | q:quit";
const TIMER_HELP: &str = "Space:start/pause | s:stop/skip | m:mode | p:popup | q:back";
const POPUP_HELP: &str = "Space:start/pause | s:stop/skip | q:close";

/// Key help for the current screen.
#[must_use]
pub fn help_text(app: &App<'_>) -> &'static str {
    match (app.screen, app.launch) {
        (Screen::Tasks, _) => TASKS_HELP,
        (Screen::Timer, Launch::Popup) => POPUP_HELP,
        (Screen::Timer, _) => TIMER_HELP,
    }
}

/// Handle terminal events.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App<'_>) -> Result<Option<Action>, PromodoroError> {
    let timeout = app.poll_timeout(Instant::now());
    if event::poll(timeout)
        .map_err(|e| PromodoroError::Terminal(format!("Event poll failed: {e}")))?
    {
        if let Event::Key(key) = event::read()
            .map_err(|e| PromodoroError::Terminal(format!("Event read failed: {e}")))?
        {
            return Ok(handle_key(app, key));
        }
    }

    Ok(None)
}

/// Map a key press to an action for the current screen.
pub fn handle_key(app: &mut App<'_>, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match app.screen {
        Screen::Tasks => handle_tasks_key(app, key.code),
        Screen::Timer => handle_timer_key(app, key.code),
    }
}

fn handle_tasks_key(app: &mut App<'_>, code: KeyCode) -> Option<Action> {
    if code != KeyCode::Char('g') {
        app.cancel_pending();
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),

        // Navigation - vim style
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') => app.handle_g(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Home => app.select_first(),

        KeyCode::Enter | KeyCode::Char('f') => return Some(Action::Focus),
        KeyCode::Char('x') => return Some(Action::Toggle),
        KeyCode::Char('v') => return Some(Action::CycleView),
        KeyCode::Char('c') => return Some(Action::CycleCategory),
        KeyCode::Char('m') => return Some(Action::CycleMode),
        KeyCode::Char('r') => return Some(Action::Refresh),

        KeyCode::Char('?') => app.status = Some(TASKS_HELP.to_string()),
        _ => {}
    }

    None
}

fn handle_timer_key(app: &mut App<'_>, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(' ') => Some(Action::StartPause),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('m') if app.launch != Launch::Popup => Some(Action::CycleMode),
        KeyCode::Char('p') if app.launch != Launch::Popup => Some(Action::Handoff),
        KeyCode::Char('?') => {
            app.status = Some(help_text(app).to_string());
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::features::focus::PopupParams;
    use crate::storage::Database;

    fn press(app: &mut App<'_>, c: char) -> Option<Action> {
        handle_key(app, KeyEvent::from(KeyCode::Char(c)))
    }

    #[test]
    fn test_tasks_keys() {
        let db = Database::open_in_memory().unwrap();
        let mut app = App::new(&db, &Config::default()).unwrap();

        assert_eq!(press(&mut app, 'x'), Some(Action::Toggle));
        assert_eq!(press(&mut app, 'v'), Some(Action::CycleView));
        assert_eq!(press(&mut app, 'q'), Some(Action::Quit));
        assert_eq!(press(&mut app, 'j'), None);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let params = PopupParams::from_query("").unwrap();
        let mut app = App::popup(&params, &Config::default());

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut app, key), Some(Action::Quit));
    }

    #[test]
    fn test_popup_has_no_mode_or_handoff() {
        let params = PopupParams::from_query("").unwrap();
        let mut app = App::popup(&params, &Config::default());

        assert_eq!(press(&mut app, ' '), Some(Action::StartPause));
        assert_eq!(press(&mut app, 'm'), None);
        assert_eq!(press(&mut app, 'p'), None);
        assert_eq!(press(&mut app, 'q'), Some(Action::Back));
    }

    #[test]
    fn test_gg_survives_between_presses() {
        let db = Database::open_in_memory().unwrap();
        let mut app = App::new(&db, &Config::default()).unwrap();

        press(&mut app, 'g');
        assert!(app.pending_g);
        press(&mut app, 'g');
        assert!(!app.pending_g);
    }
}
