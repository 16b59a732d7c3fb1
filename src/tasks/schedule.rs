use chrono::{DateTime, Datelike, Duration, Month, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::calendar::days_in_month;
use crate::model::{FrequencySpec, IntervalUnit, Task};

/// Due date that follows once `task` is completed or skipped at `acted_at`.
///
/// Rolling tasks (and tasks without a due date) count from `acted_at`;
/// the rest count from their outstanding due date. Day, week and month steps
/// are taken on the local calendar of `acted_at`'s zone, keeping the time of
/// day. Returns `None` for one-off tasks, and for a step that leaves chrono's
/// date range.
pub fn next_due_date<Tz: TimeZone>(task: &Task, acted_at: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let tz   = acted_at.timezone();
    let base = match task.next_due_date {
        Some(due) if !task.is_rolling => due.with_timezone(&tz),
        _ => acted_at.clone(),
    };
    let local = base.naive_local();

    let next = match &task.frequency {
        FrequencySpec::Once    => return None,
        FrequencySpec::Daily   => add_days(local, 1)?,
        FrequencySpec::Weekly  => add_days(local, 7)?,
        FrequencySpec::Monthly => local.checked_add_months(Months::new(1))?,
        FrequencySpec::Yearly  => local.checked_add_months(Months::new(12))?,
        FrequencySpec::Interval { every, unit } => {
            let n = i64::from(*every);
            match unit {
                IntervalUnit::Hours => {
                    return base.with_timezone(&Utc).checked_add_signed(Duration::try_hours(n)?);
                }
                IntervalUnit::Days   => add_days(local, n)?,
                IntervalUnit::Weeks  => add_days(local, n.checked_mul(7)?)?,
                IntervalUnit::Months => local.checked_add_months(Months::new(*every))?,
                IntervalUnit::Years  => local.checked_add_months(Months::new(every.checked_mul(12)?))?,
            }
        }
        FrequencySpec::DaysOfWeek { days } => (1..=7)
            .filter_map(|n| add_days(local, n))
            .find(|d| days.contains(&d.weekday()))?,
        FrequencySpec::DayOfMonth { months } => next_in_months(local, months)?,
    };

    Some(to_utc(&tz, next))
}

fn add_days(local: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    local.checked_add_signed(Duration::try_days(n)?)
}

/// Same day of month (clamped to the month's length) in the first later month
/// listed in `months`.
fn next_in_months(local: NaiveDateTime, months: &[Month]) -> Option<NaiveDateTime> {
    let day = local.day();
    (1..=12).find_map(|offset| {
        let first = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)?
            .checked_add_months(Months::new(offset))?;
        let month = Month::try_from(first.month() as u8).ok()?;
        if !months.contains(&month) {
            return None;
        }
        let day = day.min(days_in_month(first.year(), first.month()));
        Some(first.with_day(day)?.and_time(local.time()))
    })
}

/// Local wall-clock time to an instant. Times skipped by a DST jump are read as UTC.
fn to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&local)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, Weekday};
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn chore(freq: FrequencySpec) -> Task {
        // due Monday 2026-10-19 09:00
        Task::new(1, "chore").with_due(at(2026, 10, 19, 9)).with_frequency(freq)
    }

    #[rstest]
    #[case::daily(FrequencySpec::Daily, at(2026, 10, 20, 9))]
    #[case::weekly(FrequencySpec::Weekly, at(2026, 10, 26, 9))]
    #[case::monthly(FrequencySpec::Monthly, at(2026, 11, 19, 9))]
    #[case::yearly(FrequencySpec::Yearly, at(2027, 10, 19, 9))]
    #[case::hours(FrequencySpec::Interval { every: 6, unit: IntervalUnit::Hours }, at(2026, 10, 19, 15))]
    #[case::days(FrequencySpec::Interval { every: 3, unit: IntervalUnit::Days }, at(2026, 10, 22, 9))]
    #[case::weeks(FrequencySpec::Interval { every: 2, unit: IntervalUnit::Weeks }, at(2026, 11, 2, 9))]
    #[case::months(FrequencySpec::Interval { every: 4, unit: IntervalUnit::Months }, at(2027, 2, 19, 9))]
    #[case::years(FrequencySpec::Interval { every: 2, unit: IntervalUnit::Years }, at(2028, 10, 19, 9))]
    fn fixed_steps_from_due_date(#[case] freq: FrequencySpec, #[case] expected: DateTime<Utc>) {
        // completed late; non-rolling tasks still count from the due date
        let done = at(2026, 10, 20, 18);
        assert_eq!(next_due_date(&chore(freq), &done), Some(expected));
    }

    #[test]
    fn rolling_counts_from_completion() {
        let task = chore(FrequencySpec::Interval { every: 3, unit: IntervalUnit::Days }).rolling();
        assert_eq!(next_due_date(&task, &at(2026, 10, 20, 18)), Some(at(2026, 10, 23, 18)));
    }

    #[test]
    fn undated_task_counts_from_completion() {
        let task = Task::new(1, "x").with_frequency(FrequencySpec::Weekly);
        assert_eq!(next_due_date(&task, &at(2026, 10, 20, 18)), Some(at(2026, 10, 27, 18)));
    }

    #[test]
    fn one_off_has_no_next_date() {
        assert_eq!(next_due_date(&chore(FrequencySpec::Once), &at(2026, 10, 19, 8)), None);
    }

    #[test]
    fn month_end_clamps() {
        let task = Task::new(1, "rent").with_due(at(2027, 1, 31, 9)).with_frequency(FrequencySpec::Monthly);
        assert_eq!(next_due_date(&task, &at(2027, 1, 31, 10)), Some(at(2027, 2, 28, 9)));
    }

    #[test]
    fn days_of_week_picks_next_listed_day() {
        let freq = FrequencySpec::days_of_week(vec![Weekday::Fri, Weekday::Mon]).unwrap();
        // due Monday -> Friday of the same week
        assert_eq!(next_due_date(&chore(freq.clone()), &at(2026, 10, 19, 10)), Some(at(2026, 10, 23, 9)));
        let only_monday = FrequencySpec::days_of_week(vec![Weekday::Mon]).unwrap();
        assert_eq!(next_due_date(&chore(only_monday), &at(2026, 10, 19, 10)), Some(at(2026, 10, 26, 9)));
    }

    #[test]
    fn day_of_month_skips_unlisted_months() {
        let freq = FrequencySpec::day_of_month(vec![Month::January, Month::March]).unwrap();
        assert_eq!(next_due_date(&chore(freq.clone()), &at(2026, 10, 19, 10)), Some(at(2027, 1, 19, 9)));

        let task = Task::new(1, "x").with_due(at(2027, 1, 31, 9)).with_frequency(
            FrequencySpec::day_of_month(vec![Month::February, Month::January]).unwrap(),
        );
        assert_eq!(next_due_date(&task, &at(2027, 1, 31, 10)), Some(at(2027, 2, 28, 9)));
    }

    #[test]
    fn day_of_month_wraps_to_same_month_next_year() {
        let freq = FrequencySpec::day_of_month(vec![Month::October]).unwrap();
        assert_eq!(next_due_date(&chore(freq), &at(2026, 10, 19, 10)), Some(at(2027, 10, 19, 9)));
    }

    #[rstest]
    #[case::hours(IntervalUnit::Hours)]
    #[case::days(IntervalUnit::Days)]
    #[case::weeks(IntervalUnit::Weeks)]
    #[case::months(IntervalUnit::Months)]
    #[case::years(IntervalUnit::Years)]
    fn huge_interval_has_no_next_date(#[case] unit: IntervalUnit) {
        // built directly, bypassing the size check in `FrequencySpec::interval`
        let task = chore(FrequencySpec::Interval { every: 4_000_000_000, unit });
        assert_eq!(next_due_date(&task, &at(2026, 10, 19, 9)), None);
    }

    #[rstest]
    #[case::hours(IntervalUnit::Hours)]
    #[case::days(IntervalUnit::Days)]
    #[case::weeks(IntervalUnit::Weeks)]
    #[case::months(IntervalUnit::Months)]
    #[case::years(IntervalUnit::Years)]
    fn largest_accepted_interval_still_schedules(#[case] unit: IntervalUnit) {
        let freq = FrequencySpec::interval(unit.max_every(), unit).unwrap();
        let next = next_due_date(&chore(freq), &at(2026, 10, 19, 9)).unwrap();
        assert!(next.year() > 3000);
    }

    #[test]
    fn days_of_week_at_end_of_range_has_no_next_date() {
        let last = NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap().and_utc();
        let task = Task::new(1, "x")
            .with_due(last)
            .with_frequency(FrequencySpec::days_of_week(vec![Weekday::Mon]).unwrap());
        assert_eq!(next_due_date(&task, &last), None);
    }

    /// UTC until 2026-03-29 01:00Z, UTC+1 after; local 01:00 to 02:00 that day never happens.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn switch() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2026, 3, 29).unwrap().and_hms_opt(1, 0, 0).unwrap()
        }
        fn winter() -> FixedOffset { FixedOffset::east_opt(0).unwrap() }
        fn summer() -> FixedOffset { FixedOffset::east_opt(3600).unwrap() }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self { SpringForward }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap_end = Self::switch() + Duration::hours(1);
            if *local < Self::switch() {
                LocalResult::Single(Self::winter())
            } else if *local < gap_end {
                LocalResult::None
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() { Self::winter() } else { Self::summer() }
        }
    }

    #[test]
    fn skipped_local_time_is_read_as_utc() {
        let gap = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap().and_hms_opt(1, 30, 0).unwrap();
        assert_eq!(to_utc(&SpringForward, gap), at(2026, 3, 29, 1) + Duration::minutes(30));

        let after = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap().and_hms_opt(3, 0, 0).unwrap();
        assert_eq!(to_utc(&SpringForward, after), at(2026, 3, 29, 2));
    }

    #[test]
    fn daily_step_into_dst_gap() {
        let due  = at(2026, 3, 28, 1) + Duration::minutes(30);
        let task = Task::new(1, "x").with_due(due).with_frequency(FrequencySpec::Daily);
        let done = due.with_timezone(&SpringForward);
        assert_eq!(next_due_date(&task, &done), Some(at(2026, 3, 29, 1) + Duration::minutes(30)));
    }

    #[test]
    fn calendar_steps_use_local_days() {
        // 23:00 UTC Monday is 01:00 Tuesday in UTC+2; the next Tuesday-only slot is a week later
        let tz   = FixedOffset::east_opt(2 * 3600).unwrap();
        let task = Task::new(1, "x")
            .with_due(at(2026, 10, 19, 23))
            .with_frequency(FrequencySpec::days_of_week(vec![Weekday::Tue]).unwrap());
        let done = at(2026, 10, 19, 23).with_timezone(&tz);
        assert_eq!(next_due_date(&task, &done), Some(at(2026, 10, 26, 23)));
    }
}
