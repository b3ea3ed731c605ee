//! Terminal charts for reports.

const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart of `(label, value)` pairs.
///
/// Bars are scaled to the largest value; labels longer than
/// `max_label_width` are truncated with "...".
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_bar_chart(
    data: &[(String, f64)],
    max_label_width: usize,
    bar_width: usize,
) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let mut lines = Vec::new();

    for (label, value) in data {
        let truncated_label = if label.chars().count() > max_label_width {
            let keep: String = label.chars().take(max_label_width.saturating_sub(3)).collect();
            format!("{keep}...")
        } else {
            format!("{label:max_label_width$}")
        };

        let bar_length = if max_value > 0.0 && value.is_finite() {
            ((value.max(0.0) / max_value * bar_width as f64) as usize).min(bar_width)
        } else {
            0
        };
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width - bar_length);

        lines.push(format!("{truncated_label} |{bar}{padding} {value:.1}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_bar_chart(&[], 10, 20), "");
    }

    #[test]
    fn test_bars_scale_to_max() {
        let data = vec![
            ("2024-03-01".to_string(), 4.0),
            ("2024-03-02".to_string(), 2.0),
        ];
        let chart = render_bar_chart(&data, 10, 10);
        let lines: Vec<_> = chart.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(&"█".repeat(10)));
        assert!(lines[0].ends_with("4.0"));
        assert_eq!(lines[1].matches('█').count(), 5);
    }

    #[test]
    fn test_long_labels_truncated() {
        let data = vec![("a very long label indeed".to_string(), 1.0)];
        let chart = render_bar_chart(&data, 8, 4);
        assert!(chart.starts_with("a ver..."));
    }

    #[test]
    fn test_all_zero() {
        let data = vec![("x".to_string(), 0.0)];
        let chart = render_bar_chart(&data, 1, 4);
        assert_eq!(chart, "x |     0.0");
    }
}
