//! The stage pipeline: a finite-state driver over the five workflow stages.
//!
//! [`Orchestrator`] owns the only [`PipelineState`]. Every mutation goes
//! through it, and at most one remote call is in flight at a time.

pub mod error;
pub mod feedback;
pub mod orchestrator;
pub mod progress;
pub mod review;
pub mod stage;
pub mod state;

pub use error::PipelineError;
pub use feedback::{ContentQuality, FeedbackForm, FeedbackRecord, Improvement, ToneAccuracy};
pub use orchestrator::{AdvanceOutcome, Orchestrator};
pub use progress::{
    BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter, RecordingProgress,
};
pub use review::FinalArtifact;
pub use stage::Stage;
pub use state::{Artifacts, LoadingFlag, PipelineState};
