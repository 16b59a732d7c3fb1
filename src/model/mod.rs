mod frequency;

pub use frequency::{FrequencyError, FrequencyMetadata, FrequencySpec, FrequencyWire, IntervalUnit};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId  = i64;
pub type LabelId = i64;

// ─── Domain models ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub frequency: FrequencySpec,
    #[serde(default)]
    pub labels: Vec<LabelId>,
    #[serde(default, rename = "notification")]
    pub notify: bool,
    #[serde(default)]
    pub notification_metadata: NotificationConfig,
    #[serde(default)]
    pub is_rolling: bool,
}

impl Task {
    pub fn new(id: TaskId, title: &str) -> Self {
        Self {
            id, title: title.to_owned(),
            next_due_date: None, frequency: FrequencySpec::Once,
            labels: Vec::new(), notify: false,
            notification_metadata: NotificationConfig::default(),
            is_rolling: false,
        }
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.next_due_date = Some(due);
        self
    }

    pub fn with_frequency(mut self, frequency: FrequencySpec) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_labels(mut self, labels: &[LabelId]) -> Self {
        self.labels = labels.to_vec();
        self
    }

    pub fn rolling(mut self) -> Self {
        self.is_rolling = true;
        self
    }

    pub fn has_label(&self, id: LabelId) -> bool {
        self.labels.contains(&id)
    }
}

/// Which reminders the backend should send. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    #[serde(default)]
    pub due_date: bool,
    #[serde(default, rename = "predue")]
    pub pre_due: bool,
    #[serde(default)]
    pub nagging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id:    LabelId,
    pub name:  String,
    pub color: String,
}

impl Label {
    pub fn new(id: LabelId, name: &str, color: &str) -> Self {
        Self { id, name: name.to_owned(), color: color.to_owned() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Skipped,
}

/// One completion or skip, with the due date that was outstanding at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub task_id:  TaskId,
    pub outcome:  Outcome,
    pub acted_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Completed no later than the due date it closed. Undated tasks count as on time.
    pub fn on_time(&self) -> bool {
        self.due_date.map(|d| self.acted_at <= d).unwrap_or(true)
    }
}

/// What the backend hands over in one go: every task plus the label catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks:  Vec<Task>,
    #[serde(default)]
    pub labels: Vec<Label>,
}
