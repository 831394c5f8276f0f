//! Broadcasting for real-time event streaming to a presentation layer.

pub mod stage_progress;

pub use stage_progress::{StageProgressBroadcaster, StageProgressEvent, StageStatus};
