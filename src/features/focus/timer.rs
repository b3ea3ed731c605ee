//! Clock formatting and duration parsing for the focus timer.

/// Format a second count as MM:SS.
///
/// Minutes are not wrapped into hours, so long stopwatch runs read `75:00`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a minute count as a human-readable string.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0 minutes".to_string();
    }

    let total_minutes = minutes.round() as u64;
    if total_minutes < 1 {
        let seconds = (minutes * 60.0).round() as u64;
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Format a second count as `{h}h {m}m {s}s`.
#[must_use]
pub fn format_hms(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

/// Parse an estimate like "25m", "1h30m", "1.5h" or "90s" into minutes.
///
/// A bare number is taken as minutes.
#[must_use]
pub fn parse_duration(s: &str) -> Option<f64> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<f64>() {
        return (minutes.is_finite() && minutes >= 0.0).then_some(minutes);
    }

    let mut total_seconds = 0.0;
    let mut current_num = String::new();
    let mut saw_unit = false;

    for c in s.chars() {
        if c.is_ascii_digit() || c == '.' {
            current_num.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let num: f64 = current_num.parse().ok()?;
            current_num.clear();
            saw_unit = true;

            match c {
                'h' => total_seconds += num * 3600.0,
                'm' => total_seconds += num * 60.0,
                's' => total_seconds += num,
                _ => return None,
            }
        }
    }

    // Trailing number without unit is minutes
    if !current_num.is_empty() {
        let num: f64 = current_num.parse().ok()?;
        total_seconds += num * 60.0;
    }

    (saw_unit && total_seconds > 0.0).then_some(total_seconds / 60.0)
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
