use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{from_now, hours_between, local_date, relative_phrase, start_of_week};
use crate::theme::ColorToken;

/// Chip text switches to "in N hours" inside this window.
pub const RELATIVE_WINDOW_HOURS: i64 = 48;

/// Display bucket for a due date. Variant order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateStatus {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    Later,
    Anytime,
}

impl DueDateStatus {
    pub const ALL: [DueDateStatus; 7] = [
        DueDateStatus::Overdue,
        DueDateStatus::Today,
        DueDateStatus::Tomorrow,
        DueDateStatus::ThisWeek,
        DueDateStatus::NextWeek,
        DueDateStatus::Later,
        DueDateStatus::Anytime,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DueDateStatus::Overdue  => "overdue",
            DueDateStatus::Today    => "today",
            DueDateStatus::Tomorrow => "tomorrow",
            DueDateStatus::ThisWeek => "this_week",
            DueDateStatus::NextWeek => "next_week",
            DueDateStatus::Later    => "later",
            DueDateStatus::Anytime  => "anytime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueDateStatus::Overdue  => "Overdue",
            DueDateStatus::Today    => "Today",
            DueDateStatus::Tomorrow => "Tomorrow",
            DueDateStatus::ThisWeek => "This Week",
            DueDateStatus::NextWeek => "Next Week",
            DueDateStatus::Later    => "Later",
            DueDateStatus::Anytime  => "Anytime",
        }
    }
}

pub fn status_color(status: DueDateStatus) -> ColorToken {
    match status {
        DueDateStatus::Overdue  => ColorToken::Danger,
        DueDateStatus::Today    => ColorToken::Warning,
        DueDateStatus::Tomorrow => ColorToken::Success,
        DueDateStatus::ThisWeek
        | DueDateStatus::NextWeek => ColorToken::Primary,
        DueDateStatus::Later
        | DueDateStatus::Anytime  => ColorToken::Neutral,
    }
}

// ─── Classifier ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    pub week_start: Weekday,
}

impl Default for Classifier {
    fn default() -> Self { Self { week_start: Weekday::Mon } }
}

impl Classifier {
    pub fn new(week_start: Weekday) -> Self { Self { week_start } }

    /// Buckets `due` relative to `now`. Calendar days are taken in `now`'s zone.
    /// Checks run in display order and the first match wins.
    pub fn classify<Tz: TimeZone>(&self, due: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> DueDateStatus {
        let Some(due) = due else { return DueDateStatus::Anytime };
        if *due <= now.with_timezone(&Utc) {
            return DueDateStatus::Overdue;
        }

        let today   = now.date_naive();
        let due_day = local_date(due, &now.timezone());
        if due_day == today {
            return DueDateStatus::Today;
        }
        if today.succ_opt() == Some(due_day) {
            return DueDateStatus::Tomorrow;
        }

        let week      = start_of_week(today, self.week_start);
        let next_week = week + Duration::days(7);
        if due_day < next_week {
            DueDateStatus::ThisWeek
        } else if due_day < next_week + Duration::days(7) {
            DueDateStatus::NextWeek
        } else {
            DueDateStatus::Later
        }
    }
}

/// [`Classifier::classify`] with weeks starting on Monday.
pub fn classify<Tz: TimeZone>(due: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> DueDateStatus {
    Classifier::default().classify(due, now)
}

// ─── Chip ─────────────────────────────────────────────────────────────────────

/// Short text for a due-date chip.
///
/// The 48-hour window is measured in whole hours and is independent of the
/// bucket boundaries, so a task in `ThisWeek` can still read "in 40 hours".
pub fn chip_text<Tz: TimeZone>(due: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> String {
    let Some(due) = due else { return "No Due Date".to_owned() };
    let hours = hours_between(now, due);
    if hours > 0 && hours < RELATIVE_WINDOW_HOURS {
        relative_phrase(hours)
    } else {
        format!("Due {}", from_now(due, now))
    }
}

pub fn chip_color<Tz: TimeZone>(due: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> ColorToken {
    let Some(due) = due else { return ColorToken::Neutral };
    let hours = hours_between(now, due);
    if hours > 0 && hours < RELATIVE_WINDOW_HOURS {
        ColorToken::Warning
    } else if *due <= now.with_timezone(&Utc) {
        ColorToken::Danger
    } else {
        ColorToken::Neutral
    }
}
