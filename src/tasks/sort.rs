use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Orders due dates in `direction`; missing dates go last either way.
pub fn compare_due_dates(
    a: Option<&DateTime<Utc>>,
    b: Option<&DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None)       => Ordering::Equal,
        (None, Some(_))    => Ordering::Greater,
        (Some(_), None)    => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending  => x.cmp(y),
            SortDirection::Descending => y.cmp(x),
        },
    }
}

/// Earliest due date first, undated tasks last.
pub fn compare_by_due_date(a: &Task, b: &Task) -> Ordering {
    compare_due_dates(a.next_due_date.as_ref(), b.next_due_date.as_ref(), SortDirection::Ascending)
}

pub fn sort_by_due_date(tasks: &mut [Task], direction: SortDirection) {
    tasks.sort_by(|a, b| {
        compare_due_dates(a.next_due_date.as_ref(), b.next_due_date.as_ref(), direction)
    });
}
