use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::store::FileRecord;

/// Notifications for a front-end showing live activity.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Watching {
        folder: String,
    },
    MissingTarget {
        folder: String,
    },
    Detected {
        job_id: String,
        filename: String,
    },
    Skipped {
        job_id: String,
        filename: String,
        reason: String,
    },
    Duplicate {
        job_id: String,
        record: FileRecord,
    },
    Organized {
        job_id: String,
        record: FileRecord,
    },
    Failed {
        job_id: String,
        filename: String,
        error: String,
    },
    Status {
        message: String,
        timestamp: DateTime<Local>,
    },
}

impl PipelineEvent {
    pub fn status(message: impl Into<String>) -> Self {
        PipelineEvent::Status {
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

pub trait ActivityObserver: Send + Sync {
    fn notify(&self, event: PipelineEvent);
}

/// Observer that drops every event.
pub struct NoopObserver;

impl ActivityObserver for NoopObserver {
    fn notify(&self, _event: PipelineEvent) {}
}

/// Fans events out over a broadcast channel.
#[derive(Clone)]
pub struct BroadcastObserver {
    sender: broadcast::Sender<PipelineEvent>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }
}

impl ActivityObserver for BroadcastObserver {
    fn notify(&self, event: PipelineEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }
}

impl Default for BroadcastObserver {
    fn default() -> Self {
        Self::new(256)
    }
}
