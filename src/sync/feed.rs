//! Live update feed. A WebSocket connection plugs in behind `EventFeed`.
//!
//! The core never owns a connection. A feed is handed to the composition root,
//! which connects it, registers handlers, and disconnects it on shutdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Label, Task, TaskId};

// ─── Event payloads ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedEvent {
    #[serde(rename = "task.created")]
    TaskCreated(Task),
    #[serde(rename = "task.updated")]
    TaskUpdated(Task),
    #[serde(rename = "task.deleted")]
    TaskDeleted { id: TaskId },
    #[serde(rename = "task.completed", rename_all = "camelCase")]
    TaskCompleted {
        id:            TaskId,
        completed_at:  DateTime<Utc>,
        #[serde(default)]
        next_due_date: Option<DateTime<Utc>>,
    },
    #[serde(rename = "task.skipped", rename_all = "camelCase")]
    TaskSkipped {
        id:            TaskId,
        skipped_at:    DateTime<Utc>,
        #[serde(default)]
        next_due_date: Option<DateTime<Utc>>,
    },
    #[serde(rename = "labels.updated")]
    LabelsUpdated(Vec<Label>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskCompleted,
    TaskSkipped,
    LabelsUpdated,
    /// Matches every event.
    Any,
}

impl FeedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FeedEvent::TaskCreated(_)        => EventKind::TaskCreated,
            FeedEvent::TaskUpdated(_)        => EventKind::TaskUpdated,
            FeedEvent::TaskDeleted { .. }    => EventKind::TaskDeleted,
            FeedEvent::TaskCompleted { .. }  => EventKind::TaskCompleted,
            FeedEvent::TaskSkipped { .. }    => EventKind::TaskSkipped,
            FeedEvent::LabelsUpdated(_)      => EventKind::LabelsUpdated,
        }
    }
}

// ─── Feed contract ────────────────────────────────────────────────────────────

pub type Handler = Box<dyn Fn(&FeedEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self { Self(Uuid::new_v4()) }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is not connected")]
    NotConnected,
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub trait EventFeed {
    fn connect(&mut self) -> Result<(), FeedError>;
    fn on(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId;
    /// Returns false if `id` was not registered.
    fn off(&mut self, id: SubscriptionId) -> bool;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
}

// ─── In-process feed ──────────────────────────────────────────────────────────

/// Feed driven by the caller: whatever is passed to [`LocalFeed::emit`] reaches
/// the handlers synchronously, in registration order.
#[derive(Default)]
pub struct LocalFeed {
    connected: bool,
    handlers:  Vec<(SubscriptionId, EventKind, Handler)>,
}

impl LocalFeed {
    pub fn new() -> Self { Self::default() }

    /// Dispatches `event` and returns how many handlers saw it.
    pub fn emit(&self, event: &FeedEvent) -> Result<usize, FeedError> {
        if !self.connected {
            return Err(FeedError::NotConnected);
        }
        let kind = event.kind();
        let mut delivered = 0;
        for (_, wanted, handler) in &self.handlers {
            if *wanted == kind || *wanted == EventKind::Any {
                handler(event);
                delivered += 1;
            }
        }
        tracing::trace!(?kind, delivered, "feed event dispatched");
        Ok(delivered)
    }

    /// Decodes a `{"type": ..., "data": ...}` frame, then dispatches it.
    pub fn emit_json(&self, raw: &str) -> Result<usize, FeedError> {
        let event: FeedEvent = serde_json::from_str(raw)?;
        self.emit(&event)
    }

    pub fn handler_count(&self) -> usize { self.handlers.len() }
}

impl EventFeed for LocalFeed {
    fn connect(&mut self) -> Result<(), FeedError> {
        self.connected = true;
        tracing::info!("feed connected");
        Ok(())
    }

    fn on(&mut self, kind: EventKind, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.push((id, kind, handler));
        id
    }

    fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _, _)| *sid != id);
        self.handlers.len() != before
    }

    fn disconnect(&mut self) {
        if self.connected {
            tracing::info!("feed disconnected");
        }
        self.connected = false;
    }

    fn is_connected(&self) -> bool { self.connected }
}
