use std::fmt;

use serde::{Deserialize, Serialize};

pub const RESEARCH_PHASE_MESSAGE: &str = "Discovering trending content on X based on pillar content";
pub const REGENERATE_MESSAGE: &str = "We are improving this content...";

/// The five steps of the workflow, strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Research,
    Ideate,
    Draft,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Ingest,
        Stage::Research,
        Stage::Ideate,
        Stage::Draft,
        Stage::Review,
    ];

    pub fn index(self) -> usize {
        match self {
            Stage::Ingest => 0,
            Stage::Research => 1,
            Stage::Ideate => 2,
            Stage::Draft => 3,
            Stage::Review => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Review
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Ingest => "1. Content Import",
            Stage::Research => "2. Research Trends",
            Stage::Ideate => "3. Generate Ideas",
            Stage::Draft => "4. Write Content",
            Stage::Review => "5. Edit & Refine",
        }
    }

    /// Shown while advancing out of this stage.
    pub fn progress_message(self) -> &'static str {
        match self {
            Stage::Ingest => "Analyzing pillar content to find trends and keywords on X",
            Stage::Research => "Generating thread ideas from the trends",
            Stage::Ideate => "Writing content for the selected thread",
            Stage::Draft => "Preparing the final review",
            Stage::Review => "",
        }
    }

    /// Notification shown when work started from this stage fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Stage::Ingest => "Error analyzing content",
            Stage::Research => "Error generating ideas",
            Stage::Ideate => "Error generating content",
            Stage::Draft => "Failed to submit feedback",
            Stage::Review => "An unknown error occurred",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Research => "research",
            Stage::Ideate => "ideate",
            Stage::Draft => "draft",
            Stage::Review => "review",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        assert_eq!(Stage::Ingest.next(), Some(Stage::Research));
        assert_eq!(Stage::Draft.next(), Some(Stage::Review));
        assert_eq!(Stage::Review.next(), None);
        assert_eq!(Stage::Ingest.prev(), None);
        assert_eq!(Stage::Review.prev(), Some(Stage::Draft));
    }

    #[test]
    fn test_index_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
        assert_eq!(Stage::from_index(5), None);
    }

    #[test]
    fn test_only_review_is_terminal() {
        assert!(Stage::Review.is_terminal());
        assert!(Stage::ALL[..4].iter().all(|s| !s.is_terminal()));
    }
}
