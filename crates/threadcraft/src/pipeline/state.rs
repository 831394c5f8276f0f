use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::artifacts::{DraftContent, IdeationResult, TrendInsights};
use crate::ingest::SourceMaterial;

use super::feedback::FeedbackForm;
use super::review::FinalArtifact;
use super::stage::Stage;

/// Everything the stages have produced so far.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub source: Option<SourceMaterial>,
    /// Parsed analyze output, forwarded verbatim to later flows.
    pub analysis: Option<Value>,
    pub research: Option<TrendInsights>,
    pub ideation: Option<IdeationResult>,
    pub selected_thread: Option<String>,
    pub draft: Option<DraftContent>,
    pub feedback: FeedbackForm,
    pub final_artifact: Option<FinalArtifact>,
}

/// Busy flag shared with observers. Cleared on drop of the guard that set it.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sets the flag; `None` if it was already set.
    pub(crate) fn acquire(&self) -> Option<LoadingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LoadingGuard(self.0.clone()))
    }
}

pub(crate) struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct PipelineState {
    pub(crate) stage: Stage,
    pub(crate) loading: LoadingFlag,
    pub(crate) progress_message: Option<String>,
    pub(crate) artifacts: Artifacts,
}

impl PipelineState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn progress_message(&self) -> Option<&str> {
        self.progress_message.as_deref()
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            stage: Stage::Ingest,
            loading: LoadingFlag::default(),
            progress_message: None,
            artifacts: Artifacts::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_flag_on_drop() {
        let flag = LoadingFlag::default();
        {
            let _guard = flag.acquire().unwrap();
            assert!(flag.is_set());
            assert!(flag.acquire().is_none());
        }
        assert!(!flag.is_set());
    }

    #[test]
    fn test_observer_clone_sees_flag() {
        let flag = LoadingFlag::default();
        let observer = flag.clone();
        let guard = flag.acquire();
        assert!(observer.is_set());
        drop(guard);
        assert!(!observer.is_set());
    }
}
