//! Plain-text rendering of a computed calendar view.

use colored::{ColoredString, Colorize};
use pickmeup_core::{CalendarInstance, CalendarView, Cell, ViewLevel};

const fn layout(level: ViewLevel) -> (usize, usize) {
    // (columns, label width)
    match level {
        ViewLevel::Days => (7, 2),
        ViewLevel::Months => (4, 3),
        ViewLevel::Years => (4, 4),
    }
}

/// Instances are printed one after another, separated by a blank line.
pub fn render(view: &CalendarView) -> String {
    view.instances
        .iter()
        .map(|instance| render_instance(view, instance))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_instance(view: &CalendarView, instance: &CalendarInstance) -> String {
    let (columns, width) = layout(instance.level);
    let inner = columns * (width + 1) - 1;
    let mut lines = Vec::new();

    let prev = if view.show_prev { view.prev_label.as_str() } else { " " };
    let next = if view.show_next { view.next_label.as_str() } else { " " };
    let title = format!("{:^inner$}", instance.header, inner = inner.saturating_sub(4));
    lines.push(format!("{prev} {} {next}", title.bold()));

    if instance.level == ViewLevel::Days {
        let names: Vec<String> = view
            .weekdays
            .iter()
            .map(|name| format!("{name:>width$}"))
            .collect();
        lines.push(names.join(" ").cyan().to_string());
    }

    for row in instance.cells.chunks(columns) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| style(cell, &format!("{:>width$}", cell.label)).to_string())
            .collect();
        lines.push(cells.join(" "));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn style(cell: &Cell, padded: &str) -> ColoredString {
    let mut text = padded.normal();
    if cell.outside_month {
        text = text.bright_black();
    }
    if cell.disabled {
        text = text.dimmed().strikethrough();
    }
    if cell.selected {
        text = text.black().on_green().bold();
    }
    if cell.today {
        text = text.underline();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickmeup_core::{FixedClock, OptionLayer, RecordingAdapter};

    fn view(layer: OptionLayer) -> CalendarView {
        let picker = pickmeup_core::attach(
            RecordingAdapter::new(),
            OptionLayer::default(),
            OptionLayer {
                flat: Some(true),
                ..layer
            },
            Box::new(FixedClock::at(2023, 5, 20)),
        );
        picker.adapter().view().cloned().unwrap()
    }

    #[test]
    fn day_grid_has_header_weekdays_and_six_weeks() {
        colored::control::set_override(false);
        let text = render(&view(OptionLayer::default()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("June, 2023"));
        assert_eq!(lines[1], "Mo Tu We Th Fr Sa Su");
        assert_eq!(lines[2], "29 30 31  1  2  3  4");
        assert!(lines.iter().all(|line| line.chars().count() == 20));
    }

    #[test]
    fn month_grid_is_three_rows() {
        colored::control::set_override(false);
        let text = render(&view(OptionLayer {
            select_day: Some(false),
            ..OptionLayer::default()
        }));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("2023"));
        assert_eq!(lines[1], "Jan Feb Mar Apr");
    }

    #[test]
    fn instances_are_separated_by_blank_lines() {
        colored::control::set_override(false);
        let text = render(&view(OptionLayer {
            calendars: Some(2),
            ..OptionLayer::default()
        }));
        assert_eq!(text.matches("\n\n").count(), 1);
        assert!(text.contains("June, 2023"));
        assert!(text.contains("May, 2023"));
    }
}
