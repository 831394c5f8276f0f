//! Typed results accumulated as the pipeline moves forward.

use serde::{Deserialize, Serialize};

pub const NO_TRENDS: &str = "No trending topics available";
pub const NO_INSIGHTS: &str = "No market insights available";

pub const NO_HOOK: &str = "No hook available.";
pub const NO_STORY: &str = "No story available.";
pub const NO_CTA: &str = "No call-to-action available.";

/// Output of the research flow.
///
/// `trends` and `market_insights` are never empty: a missing section is
/// replaced by a single sentinel entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendInsights {
    pub trends: Vec<String>,
    pub market_insights: Vec<String>,
    /// The comma-separated trend line exactly as the service wrote it.
    /// Empty when the section was missing.
    #[serde(default)]
    pub raw_trend_line: String,
}

impl TrendInsights {
    pub fn has_trends(&self) -> bool {
        !(self.trends.len() == 1 && self.trends[0] == NO_TRENDS)
    }

    pub fn has_market_insights(&self) -> bool {
        !(self.market_insights.len() == 1 && self.market_insights[0] == NO_INSIGHTS)
    }
}

impl Default for TrendInsights {
    fn default() -> Self {
        Self {
            trends: vec![NO_TRENDS.to_string()],
            market_insights: vec![NO_INSIGHTS.to_string()],
            raw_trend_line: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadIdea {
    pub suggested_title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeationResult {
    pub analysis: String,
    pub thread_ideas: Vec<ThreadIdea>,
}

impl IdeationResult {
    pub fn contains_title(&self, title: &str) -> bool {
        self.thread_ideas.iter().any(|t| t.suggested_title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.thread_ideas.iter().map(|t| t.suggested_title.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftContent {
    pub hook: String,
    pub story: String,
    pub cta: String,
}

impl DraftContent {
    /// `hook`, `story`, `cta` separated by blank lines.
    pub fn merged(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.hook, self.story, self.cta)
    }
}

impl Default for DraftContent {
    fn default() -> Self {
        Self {
            hook: NO_HOOK.to_string(),
            story: NO_STORY.to_string(),
            cta: NO_CTA.to_string(),
        }
    }
}
