use colored::Colorize;

use crate::features::focus::render_progress_bar;
use crate::features::tasks::Task;

/// Compact minute count: "45m", "1h 30m", "2h".
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_minutes_short(minutes: f64) -> String {
    let total = if minutes.is_finite() && minutes > 0.0 {
        minutes.round() as u64
    } else {
        0
    };
    let (hours, mins) = (total / 60, total % 60);

    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn time_column(task: &Task) -> String {
    let text = format!(
        "{} / {}",
        format_minutes_short(task.actual_minutes),
        format_minutes_short(task.estimated_minutes)
    );
    if task.actual_minutes > task.estimated_minutes && task.estimated_minutes > 0.0 {
        text.red().to_string()
    } else {
        text.yellow().to_string()
    }
}

/// Format a list of tasks as a pretty table
#[must_use]
pub fn format_tasks_pretty(tasks: &[Task], title: &str, hide_times: bool) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 items)\n  No items");
    }

    let mut output = format!("{title} ({} items)\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let status_icon = if task.completed {
            "[x]".green()
        } else {
            "[ ]".white()
        };

        let mut line = format!(
            "{} {}  {}",
            status_icon,
            task.short_id().dimmed(),
            task.title.bold()
        );
        line.push_str(&format!("  {}", task.category.cyan()));

        if !hide_times {
            line.push_str(&format!("  {}", time_column(task)));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single task as pretty output
#[must_use]
pub fn format_task_pretty(task: &Task) -> String {
    let status_icon = if task.completed {
        "[x]".green()
    } else {
        "[ ]".white()
    };

    let mut output = format!("{} {}\n", status_icon, task.title.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), task.id));
    output.push_str(&format!("  {}: {}\n", "Category".dimmed(), task.category));
    output.push_str(&format!(
        "  {}: {}\n",
        "Estimated".dimmed(),
        format_minutes_short(task.estimated_minutes)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Worked".dimmed(),
        format_minutes_short(task.actual_minutes)
    ));
    if task.estimated_minutes > 0.0 {
        let progress = task.actual_minutes / task.estimated_minutes;
        let mut line = format!(
            "  {}: {} {:.0}%",
            "Progress".dimmed(),
            render_progress_bar(progress, 20),
            progress * 100.0
        );
        let overrun = task.overrun_minutes();
        if overrun > 0.0 {
            line.push_str(&format!(
                "  {}",
                format!("over by {}", format_minutes_short(overrun)).red()
            ));
        }
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        task.created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    ));

    if let Some(done) = &task.completed_at {
        output.push_str(&format!(
            "  {}: {}\n",
            "Completed".dimmed(),
            done.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ));
    }

    output
}
