//! Per-stage predicates deciding whether the user may move on.

use crate::pipeline::state::Artifacts;
use crate::pipeline::Stage;

/// Whether `advance()` may leave `stage` given what has been produced.
pub fn can_advance(stage: Stage, artifacts: &Artifacts) -> bool {
    match stage {
        Stage::Ingest => artifacts
            .source
            .as_ref()
            .is_some_and(|source| source.has_content()),
        Stage::Research => artifacts.research.is_some() && artifacts.analysis.is_some(),
        Stage::Ideate => artifacts.selected_thread.is_some(),
        Stage::Draft => artifacts.draft.is_some(),
        Stage::Review => false,
    }
}

/// Whether the Draft stage's regenerate action may run.
pub fn can_regenerate(stage: Stage, artifacts: &Artifacts) -> bool {
    stage == Stage::Draft && artifacts.draft.is_some() && artifacts.feedback.has_flags()
}
