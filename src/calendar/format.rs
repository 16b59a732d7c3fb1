use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Phrase used for the short window before a due date: "in 3 hours".
pub fn relative_phrase(hours: i64) -> String {
    match hours {
        1 => "in 1 hour".to_owned(),
        h => format!("in {h} hours"),
    }
}

/// Humanised distance between `now` and `due`: "in 5 days", "2 months ago".
///
/// Thresholds follow the usual calendar-app rounding: under 45 seconds is
/// "a few seconds", under 90 minutes is "an hour", under 36 hours is "a day",
/// under 45 days is "a month", under 548 days is "a year".
pub fn from_now<Tz: TimeZone>(due: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let secs   = (*due - now.with_timezone(&Utc)).num_seconds();
    let future = secs >= 0;
    let secs   = secs.unsigned_abs();

    let round = |unit: u64| (secs + unit / 2) / unit;
    let span = match secs {
        s if s < 45              => "a few seconds".to_owned(),
        s if s < 90              => "a minute".to_owned(),
        s if s < 45 * 60         => format!("{} minutes", round(60)),
        s if s < 90 * 60         => "an hour".to_owned(),
        s if s < 22 * 3600       => format!("{} hours", round(3600)),
        s if s < 36 * 3600       => "a day".to_owned(),
        s if s < 26 * 86_400     => format!("{} days", round(86_400)),
        s if s < 45 * 86_400     => "a month".to_owned(),
        s if s < 320 * 86_400    => format!("{} months", round(2_629_746).max(2)),
        s if s < 548 * 86_400    => "a year".to_owned(),
        _                        => format!("{} years", round(31_556_952).max(2)),
    };

    if future { format!("in {span}") } else { format!("{span} ago") }
}

/// Calendar-relative wording: "Today at 5:00 PM", "Last Monday at 9:30 AM",
/// falling back to "10/19/2026" outside the surrounding week.
pub fn format_due_calendar<Tz: TimeZone>(due: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let local = due.with_timezone(&now.timezone()).naive_local();
    let days  = (local.date() - now.date_naive()).num_days();
    let time  = local.format("%-I:%M %p");

    match days {
        0            => format!("Today at {time}"),
        1            => format!("Tomorrow at {time}"),
        -1           => format!("Yesterday at {time}"),
        2..=6        => format!("{} at {time}", local.format("%A")),
        -6..=-2      => format!("Last {} at {time}", local.format("%A")),
        _            => local.format("%m/%d/%Y").to_string(),
    }
}

/// "Mon, Oct 19 at 9:00 AM", with the year appended when it is not `now`'s.
pub fn format_due_absolute<Tz: TimeZone>(due: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let local = due.with_timezone(&now.timezone()).naive_local();
    if local.year() == now.year() {
        local.format("%a, %b %-d at %-I:%M %p").to_string()
    } else {
        local.format("%a, %b %-d %Y at %-I:%M %p").to_string()
    }
}
