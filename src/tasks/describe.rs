use chrono::{Datelike, NaiveDate};

use crate::calendar::{ordinal_suffix, short_month, short_weekday};
use crate::model::{FrequencySpec, IntervalUnit};

/// Human-readable recurrence, e.g. "Every 3 days", "Mon, Wed, Fri", "15th of Jan, Mar".
///
/// `next_due` only matters for `DayOfMonth`, which takes its day from it
/// (0 when the task has no due date).
pub fn describe(freq: &FrequencySpec, next_due: Option<NaiveDate>) -> String {
    match freq {
        FrequencySpec::Once    => "Once".to_owned(),
        FrequencySpec::Daily   => "Daily".to_owned(),
        FrequencySpec::Weekly  => "Weekly".to_owned(),
        FrequencySpec::Monthly => "Monthly".to_owned(),
        FrequencySpec::Yearly  => "Yearly".to_owned(),
        FrequencySpec::Interval { every: 1, unit } => cadence_word(*unit).to_owned(),
        FrequencySpec::Interval { every, unit }    => format!("Every {every} {}", unit.as_str()),
        FrequencySpec::DaysOfWeek { days } => {
            debug_assert!(!days.is_empty(), "days-of-week frequency with no days");
            days.iter().map(|d| short_weekday(*d)).collect::<Vec<_>>().join(", ")
        }
        FrequencySpec::DayOfMonth { months } => {
            debug_assert!(!months.is_empty(), "day-of-month frequency with no months");
            let day    = next_due.map(|d| d.day()).unwrap_or(0);
            let months = months.iter().map(|m| short_month(*m)).collect::<Vec<_>>().join(", ");
            format!("{day}{} of {months}", ordinal_suffix(day))
        }
    }
}

fn cadence_word(unit: IntervalUnit) -> &'static str {
    match unit {
        IntervalUnit::Hours  => "Hourly",
        IntervalUnit::Days   => "Daily",
        IntervalUnit::Weeks  => "Weekly",
        IntervalUnit::Months => "Monthly",
        IntervalUnit::Years  => "Yearly",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};
    use rstest::rstest;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 1, d)
    }

    #[rstest]
    #[case(FrequencySpec::Once, "Once")]
    #[case(FrequencySpec::Daily, "Daily")]
    #[case(FrequencySpec::Weekly, "Weekly")]
    #[case(FrequencySpec::Monthly, "Monthly")]
    #[case(FrequencySpec::Yearly, "Yearly")]
    #[case(FrequencySpec::Interval { every: 1, unit: IntervalUnit::Hours }, "Hourly")]
    #[case(FrequencySpec::Interval { every: 1, unit: IntervalUnit::Days }, "Daily")]
    #[case(FrequencySpec::Interval { every: 1, unit: IntervalUnit::Weeks }, "Weekly")]
    #[case(FrequencySpec::Interval { every: 1, unit: IntervalUnit::Months }, "Monthly")]
    #[case(FrequencySpec::Interval { every: 1, unit: IntervalUnit::Years }, "Yearly")]
    #[case(FrequencySpec::Interval { every: 3, unit: IntervalUnit::Weeks }, "Every 3 weeks")]
    #[case(FrequencySpec::Interval { every: 12, unit: IntervalUnit::Hours }, "Every 12 hours")]
    fn fixed_and_interval(#[case] freq: FrequencySpec, #[case] expected: &str) {
        assert_eq!(describe(&freq, day(5)), expected);
        assert_eq!(describe(&freq, None), expected);
    }

    #[test]
    fn weekdays_keep_stored_order() {
        let freq = FrequencySpec::days_of_week(vec![Weekday::Fri, Weekday::Mon, Weekday::Wed]).unwrap();
        assert_eq!(describe(&freq, None), "Fri, Mon, Wed");
    }

    #[rstest]
    #[case(day(15), "15th of Jan, Mar")]
    #[case(day(1), "1st of Jan, Mar")]
    #[case(day(22), "22nd of Jan, Mar")]
    #[case(day(13), "13th of Jan, Mar")]
    #[case(None, "0th of Jan, Mar")]
    fn day_of_month_uses_due_day(#[case] due: Option<NaiveDate>, #[case] expected: &str) {
        let freq = FrequencySpec::day_of_month(vec![Month::January, Month::March]).unwrap();
        assert_eq!(describe(&freq, due), expected);
    }
}
