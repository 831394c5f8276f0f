use serde::Serialize;

use crate::artifacts::DraftContent;

/// The editable text shown at the Review stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalArtifact {
    working: String,
    approved: Option<String>,
    original: String,
}

impl FinalArtifact {
    pub fn from_draft(draft: &DraftContent) -> Self {
        let original = draft.merged();
        Self {
            working: original.clone(),
            approved: None,
            original,
        }
    }

    pub fn text(&self) -> &str {
        &self.working
    }

    pub fn approved(&self) -> Option<&str> {
        self.approved.as_deref()
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn edit(&mut self, text: &str) {
        self.working = text.to_string();
    }

    /// Differs from both the approved snapshot and the merged draft.
    pub fn is_dirty(&self) -> bool {
        self.approved.as_deref() != Some(self.working.as_str()) && self.working != self.original
    }

    /// Snapshots the working text. Returns `false` when there was nothing to approve.
    pub fn approve(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.approved = Some(self.working.clone());
        true
    }

    /// Discards edits, back to the approved text or the merged draft.
    /// Returns `false` when there was nothing to discard.
    pub fn reject(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.working = self
            .approved
            .clone()
            .unwrap_or_else(|| self.original.clone());
        true
    }
}
