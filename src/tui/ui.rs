//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::features::focus::{format_clock, EngineState, TimerMode};
use crate::features::tasks::TaskStatus;
use crate::output::format_minutes_short;
use crate::tui::app::{App, Screen};
use crate::tui::event::help_text;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App<'_>) {
    // Create layout: header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.screen {
        Screen::Tasks => render_list(frame, app, chunks[1]),
        Screen::Timer => render_timer(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);
}

fn header_title(app: &App<'_>) -> String {
    match app.screen {
        Screen::Tasks => {
            let view = match app.view {
                TaskStatus::Active => "Active",
                TaskStatus::Completed => "Completed",
                TaskStatus::All => "All",
            };
            let category = app.category.as_deref().unwrap_or("All categories");
            format!(
                " {view} tasks ({}) | {category} | Mode: {} ",
                app.tasks.len(),
                app.mode
            )
        }
        Screen::Timer => {
            let snapshot = app.engine.snapshot();
            let title = snapshot.task_title.unwrap_or_default();
            let mode = snapshot.mode.unwrap_or(app.mode);
            format!(" {title} | {mode} ")
        }
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let header = Paragraph::new(header_title(app))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render the task list.
fn render_list(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_selected = i == app.selected;

            let (icon, icon_color) = if task.completed {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::White)
            };

            let times_color = if task.actual_minutes > task.estimated_minutes
                && task.estimated_minutes > 0.0
            {
                Color::Red
            } else {
                Color::Yellow
            };

            let mut spans = vec![
                Span::styled(format!("{icon} "), Style::default().fg(icon_color)),
                Span::styled(
                    &task.title,
                    Style::default().add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
                Span::styled(
                    format!("  [{}]", task.category),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if !app.hide_times {
                spans.push(Span::styled(
                    format!(
                        "  {} / {}",
                        format_minutes_short(task.actual_minutes),
                        format_minutes_short(task.estimated_minutes)
                    ),
                    Style::default().fg(times_color),
                ));
            }

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the focus timer.
fn render_timer(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let snapshot = app.engine.snapshot();

    let (phase, color) = match snapshot.state {
        EngineState::OnBreak => ("Break", Color::Green),
        EngineState::Working if snapshot.mode == Some(TimerMode::Stopwatch) => {
            ("Elapsed", Color::Cyan)
        }
        EngineState::Working => ("Focus", Color::Red),
        EngineState::Idle => ("Idle", Color::DarkGray),
    };
    let state_label = if snapshot.running { "running" } else { "paused" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Phase
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let phase_line = Paragraph::new(format!("{phase} ({state_label})"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(phase_line, rows[1]);

    let clock = Paragraph::new(format_clock(snapshot.seconds))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(clock, rows[2]);

    if snapshot.mode != Some(TimerMode::Stopwatch) {
        let gauge_area = centered(rows[4], 60);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(snapshot.progress.clamp(0.0, 1.0));
        frame.render_widget(gauge, gauge_area);
    }
}

/// Horizontally center a region of `percent` width.
fn centered(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Percentage(side),
        ])
        .split(area)[1]
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or_else(|| help_text(app));
    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
