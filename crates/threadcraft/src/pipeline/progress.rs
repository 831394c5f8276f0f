use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::broadcast::stage_progress::{StageProgressEvent, StageStatus};

use super::stage::Stage;

/// Events emitted by the orchestrator as it works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { stage: Stage, message: String },
    Advanced { from: Stage, to: Stage },
    Regenerated,
    Failed { stage: Stage, notification: String },
    Notice { stage: Stage, message: String },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for when nobody is listening.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Keeps every event; for tests and headless embedders.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Bridges orchestrator events onto a broadcast channel.
pub struct BroadcastProgress {
    session_id: String,
    sender: Arc<broadcast::Sender<StageProgressEvent>>,
}

impl BroadcastProgress {
    pub fn new(session_id: &str, sender: Arc<broadcast::Sender<StageProgressEvent>>) -> Self {
        Self {
            session_id: session_id.to_string(),
            sender,
        }
    }

    fn send(&self, event: StageProgressEvent) {
        let _ = self.sender.send(event);
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        let id = &self.session_id;
        let event = match event {
            ProgressEvent::Started { stage, message } => {
                StageProgressEvent::new(id, stage, StageStatus::Running, &message)
            }
            ProgressEvent::Advanced { from, to } => StageProgressEvent::new(
                id,
                to,
                StageStatus::Completed,
                &format!("Moved from {} to {}", from.title(), to.title()),
            ),
            ProgressEvent::Regenerated => {
                StageProgressEvent::new(id, Stage::Draft, StageStatus::Completed, "Draft updated")
            }
            ProgressEvent::Failed {
                stage,
                notification,
            } => StageProgressEvent::failed(id, stage, &notification),
            ProgressEvent::Notice { stage, message } => {
                StageProgressEvent::new(id, stage, StageStatus::Notice, &message)
            }
        };
        self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::StageProgressBroadcaster;

    #[test]
    fn test_broadcast_progress_maps_events() {
        let broadcaster = StageProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let progress = BroadcastProgress::new("s-1", broadcaster.sender());

        progress.report(ProgressEvent::Advanced {
            from: Stage::Ingest,
            to: Stage::Research,
        });
        progress.report(ProgressEvent::Failed {
            stage: Stage::Ingest,
            notification: "Error analyzing content".to_string(),
        });

        let advanced = rx.try_recv().unwrap();
        assert_eq!(advanced.stage, Stage::Research);
        assert_eq!(advanced.status, StageStatus::Completed);

        let failed = rx.try_recv().unwrap();
        assert_eq!(failed.status, StageStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("Error analyzing content"));
    }

    #[test]
    fn test_recording_progress() {
        let progress = RecordingProgress::default();
        progress.report(ProgressEvent::Regenerated);
        assert_eq!(progress.events(), vec![ProgressEvent::Regenerated]);
    }
}
