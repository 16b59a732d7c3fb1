use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::{Label, LabelId, Task};
use crate::tasks::classify::{status_color, Classifier, DueDateStatus};
use crate::theme::ThemeConfig;

/// Key of the synthetic bucket holding tasks without labels.
pub const UNLABELED_KEY: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Status(DueDateStatus),
    Label(LabelId),
    Unlabeled,
}

impl GroupKey {
    pub fn as_key(&self) -> String {
        match self {
            GroupKey::Status(s) => s.key().to_owned(),
            GroupKey::Label(id) => id.to_string(),
            GroupKey::Unlabeled => UNLABELED_KEY.to_owned(),
        }
    }
}

/// One display bucket. Rebuilt on every grouping pass.
#[derive(Debug, Clone, Serialize)]
pub struct TaskGroup<'a> {
    pub key:   GroupKey,
    pub name:  String,
    pub color: String,
    pub tasks: Vec<&'a Task>,
}

impl<'a> TaskGroup<'a> {
    fn new(key: GroupKey, name: &str, color: &str) -> Self {
        Self { key, name: name.to_owned(), color: color.to_owned(), tasks: Vec::new() }
    }

    pub fn len(&self) -> usize { self.tasks.len() }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }
}

// ─── Grouper ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Grouper {
    pub classifier: Classifier,
    pub theme:      ThemeConfig,
}

impl Grouper {
    pub fn new(classifier: Classifier, theme: ThemeConfig) -> Self {
        Self { classifier, theme }
    }

    /// Stable partition into all seven status buckets, empty ones included.
    /// Every task is classified against the same `now`.
    pub fn by_due_date<'a, Tz: TimeZone>(
        &self,
        tasks: &'a [Task],
        now:   &DateTime<Tz>,
    ) -> BTreeMap<DueDateStatus, TaskGroup<'a>> {
        let mut groups: BTreeMap<DueDateStatus, TaskGroup<'a>> = DueDateStatus::ALL
            .iter()
            .map(|&s| (s, TaskGroup::new(
                GroupKey::Status(s), s.label(), self.theme.hex(status_color(s)),
            )))
            .collect();

        for task in tasks {
            let status = self.classifier.classify(task.next_due_date.as_ref(), now);
            if let Some(group) = groups.get_mut(&status) {
                group.tasks.push(task);
            }
        }

        tracing::debug!(
            tasks = tasks.len(),
            overdue = groups.get(&DueDateStatus::Overdue).map(TaskGroup::len).unwrap_or(0),
            "grouped by due date"
        );
        groups
    }

    /// One bucket per catalogue label, in catalogue order, then the unlabeled
    /// bucket. A task carrying several labels shows up under each of them.
    pub fn by_label<'a>(&self, tasks: &'a [Task], labels: &[Label]) -> Vec<TaskGroup<'a>> {
        let mut groups: Vec<TaskGroup<'a>> = labels
            .iter()
            .map(|label| {
                let mut group = TaskGroup::new(GroupKey::Label(label.id), &label.name, &label.color);
                group.tasks = tasks.iter().filter(|t| t.has_label(label.id)).collect();
                group
            })
            .collect();

        let mut unlabeled = TaskGroup::new(GroupKey::Unlabeled, "No Labels", &self.theme.unlabeled);
        unlabeled.tasks = tasks.iter().filter(|t| t.labels.is_empty()).collect();
        groups.push(unlabeled);

        tracing::debug!(tasks = tasks.len(), buckets = groups.len(), "grouped by label");
        groups
    }
}

pub fn group_by_due_date<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    now:   &DateTime<Tz>,
) -> BTreeMap<DueDateStatus, TaskGroup<'a>> {
    Grouper::default().by_due_date(tasks, now)
}

pub fn group_by_label<'a>(tasks: &'a [Task], labels: &[Label]) -> Vec<TaskGroup<'a>> {
    Grouper::default().by_label(tasks, labels)
}

/// Concatenates bucket contents in bucket order.
pub fn flatten<'a, 'g, I>(groups: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'g TaskGroup<'a>>,
    'a: 'g,
{
    groups.into_iter().flat_map(|g| g.tasks.iter().copied()).collect()
}
