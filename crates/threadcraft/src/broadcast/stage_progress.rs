//! Stage progress broadcaster for streaming pipeline activity to a frontend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::pipeline::Stage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Remote work for the stage has started.
    Running,
    /// The pipeline moved forward (or regenerated in place).
    Completed,
    /// Work failed; `error` carries the notification.
    Failed,
    /// Informational message, e.g. a review action.
    Notice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgressEvent {
    /// Identifies the orchestrator session that emitted the event.
    pub session_id: String,
    /// Stage the pipeline is at when the event is emitted.
    pub stage: Stage,
    pub status: StageStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageProgressEvent {
    pub fn new(session_id: &str, stage: Stage, status: StageStatus, message: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            stage,
            status,
            message: message.to_string(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failed(session_id: &str, stage: Stage, error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(session_id, stage, StageStatus::Failed, "Stage failed")
        }
    }
}

/// Broadcasts stage progress events to any number of subscribers.
#[derive(Clone)]
pub struct StageProgressBroadcaster {
    sender: Arc<broadcast::Sender<StageProgressEvent>>,
}

impl StageProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: StageProgressEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StageProgressEvent> {
        self.sender.subscribe()
    }

    pub fn sender(&self) -> Arc<broadcast::Sender<StageProgressEvent>> {
        self.sender.clone()
    }
}

impl Default for StageProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
