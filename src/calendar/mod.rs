//! Calendar arithmetic shared by the classifier, descriptor and scheduler.

mod format;

pub use format::{format_due_absolute, format_due_calendar, from_now, relative_phrase};

use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, TimeZone, Utc, Weekday};

// ─── Month / week arithmetic ──────────────────────────────────────────────────

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (NaiveDate::from_ymd_opt(year, month, 1), next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// First day of the week containing `date`, for weeks beginning on `week_start`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday()
        - week_start.num_days_from_monday()) % 7;
    date - Duration::days(offset as i64)
}

/// Calendar day of `instant` as seen from the time zone `tz`.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Whole hours from `from` to `to`, truncated toward zero.
pub fn hours_between<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> i64 {
    (to.with_timezone(&Utc) - from.with_timezone(&Utc)).num_hours()
}

// ─── Ordinals ─────────────────────────────────────────────────────────────────

pub fn ordinal_suffix(n: u32) -> &'static str {
    match n % 100 {
        11 | 12 | 13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

pub fn ordinal(n: u32) -> String {
    format!("{n}{}", ordinal_suffix(n))
}

// ─── Names ────────────────────────────────────────────────────────────────────

/// Weekday for a Sunday-based index (0 = Sunday .. 6 = Saturday).
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn short_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn short_month(month: Month) -> &'static str {
    const SHORT: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun",
        "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    SHORT[month.number_from_month() as usize - 1]
}

/// Case-insensitive, full or three-letter name.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}

/// Case-insensitive, full or three-letter name.
pub fn parse_month(s: &str) -> Option<Month> {
    s.trim().parse().ok()
}
