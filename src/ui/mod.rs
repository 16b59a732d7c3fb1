//! Plain-text board rendering for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone};

use crate::model::{HistoryEntry, Outcome};
use crate::tasks::{chip_color, chip_text, describe_task, TaskGroup};
use crate::theme::{parse_hex, ThemeConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// 24-bit ANSI colour for headers and chips.
    pub color:       bool,
    /// Print buckets that have no tasks.
    pub show_empty:  bool,
}

fn paint(text: &str, hex: &str, on: bool) -> String {
    match (on, parse_hex(hex)) {
        (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_owned(),
    }
}

// ─── Board ────────────────────────────────────────────────────────────────────

pub fn render_groups<'a, 'g, I, Tz>(
    groups: I,
    now:    &DateTime<Tz>,
    theme:  &ThemeConfig,
    opts:   RenderOptions,
) -> String
where
    I: IntoIterator<Item = &'g TaskGroup<'a>>,
    'a: 'g,
    Tz: TimeZone,
{
    let mut out = String::new();
    for group in groups {
        if group.is_empty() && !opts.show_empty { continue; }

        let header = format!("── {} ({}) ", group.name, group.len());
        let _ = writeln!(out, "{}", paint(&header, &group.color, opts.color));

        if group.is_empty() {
            let _ = writeln!(out, "   (none)");
        }
        for task in &group.tasks {
            let due  = task.next_due_date.as_ref();
            let chip = paint(&chip_text(due, now), theme.hex(chip_color(due, now)), opts.color);
            let _ = writeln!(
                out,
                "   #{:<5} {:<28} {}  · {}",
                task.id, task.title, chip, describe_task(task, now),
            );
        }
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("Nothing to show.\n");
    }
    out
}

pub fn render_history<Tz: TimeZone>(entries: &[&HistoryEntry], now: &DateTime<Tz>) -> String {
    let mut out = String::new();
    for entry in entries {
        let verb = match entry.outcome {
            Outcome::Completed => "completed",
            Outcome::Skipped   => "skipped",
        };
        let when = crate::calendar::format_due_absolute(&entry.acted_at, now);
        let late = if entry.on_time() { "" } else { " (late)" };
        let _ = writeln!(out, "   #{} {verb} {when}{late}", entry.task_id);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use crate::tasks::group_by_due_date;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 21, 10, 0, 0).unwrap()
    }

    #[test]
    fn skips_empty_buckets_by_default() {
        let tasks  = vec![Task::new(1, "Feed cat").with_due(now() + Duration::hours(3))];
        let groups = group_by_due_date(&tasks, &now());
        let text   = render_groups(groups.values(), &now(), &ThemeConfig::default(), RenderOptions::default());
        assert!(text.contains("── Today (1)"));
        assert!(text.contains("Feed cat"));
        assert!(text.contains("in 3 hours"));
        assert!(text.contains("· Once"));
        assert!(!text.contains("Overdue"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn show_empty_lists_every_bucket() {
        let groups = group_by_due_date(&[], &now());
        let opts   = RenderOptions { show_empty: true, ..Default::default() };
        let text   = render_groups(groups.values(), &now(), &ThemeConfig::default(), opts);
        assert_eq!(text.matches("(none)").count(), 7);
    }

    #[test]
    fn color_wraps_headers() {
        let tasks  = vec![Task::new(1, "x")];
        let groups = group_by_due_date(&tasks, &now());
        let opts   = RenderOptions { color: true, ..Default::default() };
        let text   = render_groups(groups.values(), &now(), &ThemeConfig::default(), opts);
        assert!(text.contains("\x1b[38;2;"));
    }
}
