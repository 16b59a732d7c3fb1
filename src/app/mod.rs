use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::{
    model::{HistoryEntry, Label, Outcome, Snapshot, Task, TaskId},
    sync::feed::FeedEvent,
    tasks::{next_due_date, DueDateStatus, Grouper, TaskGroup},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
    #[error("task {0} has no next occurrence in the supported date range")]
    OutOfRange(TaskId),
}

// ─── Board state ──────────────────────────────────────────────────────────────

/// Everything the views read from: tasks, the label catalogue, and the
/// completion history. Only changed through [`Board::apply`], [`Board::complete`]
/// and [`Board::skip`].
#[derive(Debug, Clone, Default)]
pub struct Board {
    tasks:   Vec<Task>,
    labels:  Vec<Label>,
    history: Vec<HistoryEntry>,
    pub grouper: Grouper,
}

impl Board {
    pub fn new(snapshot: Snapshot, grouper: Grouper) -> Self {
        Self { tasks: snapshot.tasks, labels: snapshot.labels, history: Vec::new(), grouper }
    }

    pub fn tasks(&self)   -> &[Task]         { &self.tasks }
    pub fn labels(&self)  -> &[Label]        { &self.labels }
    pub fn history(&self) -> &[HistoryEntry] { &self.history }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Newest first.
    pub fn history_for(&self, id: TaskId) -> Vec<&HistoryEntry> {
        self.history.iter().rev().filter(|h| h.task_id == id).collect()
    }

    pub fn by_due_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> BTreeMap<DueDateStatus, TaskGroup<'_>> {
        self.grouper.by_due_date(&self.tasks, now)
    }

    pub fn by_label(&self) -> Vec<TaskGroup<'_>> {
        self.grouper.by_label(&self.tasks, &self.labels)
    }

    // ── Feed events ───────────────────────────────────────────────────────────

    /// Applies a server-side change. Returns false when the event referred to
    /// a task the board does not know.
    pub fn apply(&mut self, event: &FeedEvent) -> bool {
        match event {
            FeedEvent::TaskCreated(task) | FeedEvent::TaskUpdated(task) => {
                self.upsert(task.clone());
                true
            }
            FeedEvent::TaskDeleted { id } => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != *id);
                self.known(*id, self.tasks.len() != before)
            }
            FeedEvent::TaskCompleted { id, completed_at, next_due_date } => {
                let found = self.record(*id, Outcome::Completed, *completed_at, *next_due_date).is_ok();
                self.known(*id, found)
            }
            FeedEvent::TaskSkipped { id, skipped_at, next_due_date } => {
                let found = self.record(*id, Outcome::Skipped, *skipped_at, *next_due_date).is_ok();
                self.known(*id, found)
            }
            FeedEvent::LabelsUpdated(labels) => {
                self.labels = labels.clone();
                true
            }
        }
    }

    fn known(&self, id: TaskId, found: bool) -> bool {
        if !found {
            tracing::warn!(task = id, "feed event for unknown task ignored");
        }
        found
    }

    fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    // ── Local actions ─────────────────────────────────────────────────────────

    pub fn complete<Tz: TimeZone>(&mut self, id: TaskId, at: &DateTime<Tz>) -> Result<HistoryEntry, BoardError> {
        self.act(id, Outcome::Completed, at)
    }

    pub fn skip<Tz: TimeZone>(&mut self, id: TaskId, at: &DateTime<Tz>) -> Result<HistoryEntry, BoardError> {
        self.act(id, Outcome::Skipped, at)
    }

    fn act<Tz: TimeZone>(&mut self, id: TaskId, outcome: Outcome, at: &DateTime<Tz>) -> Result<HistoryEntry, BoardError> {
        let task = self.task(id).ok_or(BoardError::UnknownTask(id))?;
        let next = next_due_date(task, at);
        if next.is_none() && task.frequency.is_recurring() {
            tracing::warn!(task = id, frequency = ?task.frequency, "next due date out of range");
            return Err(BoardError::OutOfRange(id));
        }
        self.record(id, outcome, at.with_timezone(&Utc), next)
    }

    /// Closes the outstanding due date of `id`. One-off tasks leave the board.
    fn record(
        &mut self,
        id:       TaskId,
        outcome:  Outcome,
        acted_at: DateTime<Utc>,
        next:     Option<DateTime<Utc>>,
    ) -> Result<HistoryEntry, BoardError> {
        let pos  = self.tasks.iter().position(|t| t.id == id).ok_or(BoardError::UnknownTask(id))?;
        let task = &mut self.tasks[pos];
        let entry = HistoryEntry { task_id: id, outcome, acted_at, due_date: task.next_due_date };

        if task.frequency.is_recurring() {
            task.next_due_date = next;
        } else {
            self.tasks.remove(pos);
        }
        tracing::info!(task = id, ?outcome, next = ?next, "task closed");

        self.history.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrequencySpec, IntervalUnit};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 21, 10, 0, 0).unwrap()
    }

    fn board() -> Board {
        let snapshot = Snapshot {
            tasks: vec![
                Task::new(1, "dishes").with_due(now() - Duration::hours(1)).with_frequency(FrequencySpec::Daily),
                Task::new(2, "passport"),
                Task::new(3, "gutters").with_due(now() + Duration::days(3)).with_labels(&[7]),
            ],
            labels: vec![Label::new(7, "Outside", "#00ff00")],
        };
        Board::new(snapshot, Grouper::default())
    }

    #[test]
    fn complete_moves_recurring_task_forward() {
        let mut board = board();
        let entry = board.complete(1, &now()).unwrap();
        assert_eq!(entry.outcome, Outcome::Completed);
        assert_eq!(entry.due_date, Some(now() - Duration::hours(1)));
        assert_eq!(board.task(1).unwrap().next_due_date, Some(now() + Duration::hours(23)));
        assert!(board.by_due_date(&now())[&DueDateStatus::Overdue].is_empty());
    }

    #[test]
    fn one_off_tasks_leave_the_board() {
        let mut board = board();
        board.skip(2, &now()).unwrap();
        assert!(board.task(2).is_none());
        assert_eq!(board.history_for(2).len(), 1);
    }

    #[test]
    fn unknown_ids_are_errors_locally_and_ignored_from_feed() {
        let mut board = board();
        assert_eq!(board.complete(42, &now()), Err(BoardError::UnknownTask(42)));
        assert!(!board.apply(&FeedEvent::TaskDeleted { id: 42 }));
        assert!(!board.apply(&FeedEvent::TaskCompleted { id: 42, completed_at: now(), next_due_date: None }));
        assert!(board.history().is_empty());
    }

    #[test]
    fn out_of_range_step_keeps_the_due_date() {
        let mut board = board();
        let due = now() + Duration::days(2);
        board.apply(&FeedEvent::TaskCreated(
            Task::new(9, "far").with_due(due).with_frequency(FrequencySpec::Interval {
                every: 4_000_000_000,
                unit:  IntervalUnit::Days,
            }),
        ));

        assert_eq!(board.complete(9, &now()), Err(BoardError::OutOfRange(9)));
        assert_eq!(board.task(9).and_then(|t| t.next_due_date), Some(due));
        assert!(board.history_for(9).is_empty());
    }

    #[test]
    fn feed_completion_trusts_server_due_date() {
        let mut board = board();
        let server_next = now() + Duration::days(9);
        assert!(board.apply(&FeedEvent::TaskCompleted { id: 1, completed_at: now(), next_due_date: Some(server_next) }));
        assert_eq!(board.task(1).unwrap().next_due_date, Some(server_next));
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut board = board();
        board.apply(&FeedEvent::TaskUpdated(Task::new(3, "gutters (front)")));
        board.apply(&FeedEvent::TaskCreated(Task::new(4, "windows")));
        assert_eq!(board.tasks().len(), 4);
        assert_eq!(board.task(3).unwrap().title, "gutters (front)");
        assert!(board.task(3).unwrap().labels.is_empty());
    }

    #[test]
    fn history_is_newest_first() {
        let mut board = board();
        board.complete(1, &now()).unwrap();
        board.skip(1, &(now() + Duration::days(1))).unwrap();
        let outcomes: Vec<_> = board.history_for(1).iter().map(|h| h.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Skipped, Outcome::Completed]);
    }

    #[test]
    fn label_catalogue_updates_regroup() {
        let mut board = board();
        assert_eq!(board.by_label().len(), 2);
        board.apply(&FeedEvent::LabelsUpdated(vec![
            Label::new(7, "Outside", "#00ff00"),
            Label::new(8, "Inside", "#0000ff"),
        ]));
        let groups = board.by_label();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 1);
        assert!(groups[1].is_empty());
        assert_eq!(groups[2].len(), 2);
    }
}
