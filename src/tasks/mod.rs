//! Due-date bucketing, recurrence text, grouping, ordering and rescheduling.

pub mod classify;
pub mod describe;
pub mod grouping;
pub mod schedule;
pub mod sort;

pub use classify::{chip_color, chip_text, classify, status_color, Classifier, DueDateStatus};
pub use describe::describe;
pub use grouping::{flatten, group_by_due_date, group_by_label, GroupKey, Grouper, TaskGroup};
pub use schedule::next_due_date;
pub use sort::{compare_by_due_date, compare_due_dates, sort_by_due_date, SortDirection};

use chrono::{DateTime, TimeZone};

use crate::calendar::local_date;
use crate::model::Task;

/// Recurrence text for `task`, reading the day of month in `now`'s zone.
pub fn describe_task<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> String {
    let due_day = task.next_due_date.as_ref().map(|d| local_date(d, &now.timezone()));
    describe(&task.frequency, due_day)
}

/// Undated and not-yet-due tasks are never overdue.
pub fn overdue<'a, Tz: TimeZone>(tasks: &'a [Task], now: &DateTime<Tz>) -> Vec<&'a Task> {
    tasks.iter()
        .filter(|t| classify(t.next_due_date.as_ref(), now) == DueDateStatus::Overdue)
        .collect()
}
